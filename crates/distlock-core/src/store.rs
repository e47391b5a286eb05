//! Key-value/lock table
//!
//! Every method expects the caller to hold the lease manager's guard; the
//! table itself performs no synchronization.

use std::collections::HashMap;

/// A value together with its exclusivity flag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockableValue {
    /// Last value written by `set` or by the acquisition that created the key
    pub value: String,
    /// True iff a live session currently holds the key
    pub locked: bool,
}

impl LockableValue {
    pub fn unlocked(value: &str) -> Self {
        Self {
            value: value.to_string(),
            locked: false,
        }
    }
}

/// Key -> lockable value
#[derive(Debug, Default)]
pub struct KeyTable {
    entries: HashMap<String, LockableValue>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&LockableValue> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut LockableValue> {
        self.entries.get_mut(key)
    }

    /// Create `key` unlocked with `value` if it does not exist yet.
    ///
    /// Never overwrites: returns false and leaves the table untouched when
    /// the key is already present.
    pub fn set_unconditional(&mut self, key: &str, value: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries
            .insert(key.to_string(), LockableValue::unlocked(value));
        true
    }

    /// Overwrite the value of an existing key
    pub(crate) fn overwrite(&mut self, key: &str, value: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub(crate) fn get_or_create(&mut self, key: &str, value: &str) -> &mut LockableValue {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| LockableValue::unlocked(value))
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<LockableValue> {
        self.entries.remove(key)
    }

    /// Keys starting with `prefix`, sorted. An empty prefix lists every key.
    ///
    /// `str::starts_with` compares bytes without slicing, so a prefix longer
    /// than a key simply does not match.
    pub fn list_keys(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LockableValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(keys: &[&str]) -> KeyTable {
        let mut table = KeyTable::new();
        for key in keys {
            assert!(table.set_unconditional(key, "v"));
        }
        table
    }

    #[test]
    fn test_set_unconditional_is_creation_only() {
        let mut table = KeyTable::new();

        assert!(table.set_unconditional("config/db", "mysql"));
        assert!(!table.set_unconditional("config/db", "postgres"));

        let entry = table.get("config/db").unwrap();
        assert_eq!(entry.value, "mysql");
        assert!(!entry.locked);
    }

    #[test]
    fn test_overwrite_requires_existing_key() {
        let mut table = KeyTable::new();
        assert!(!table.overwrite("missing", "v"));
        assert!(table.get("missing").is_none());

        table.set_unconditional("k", "v1");
        assert!(table.overwrite("k", "v2"));
        assert_eq!(table.get("k").unwrap().value, "v2");
    }

    #[test]
    fn test_get_or_create_keeps_existing_value() {
        let mut table = KeyTable::new();
        table.set_unconditional("k", "first");

        let entry = table.get_or_create("k", "second");
        assert_eq!(entry.value, "first");

        let entry = table.get_or_create("fresh", "created");
        assert_eq!(entry.value, "created");
        assert!(!entry.locked);
    }

    #[test]
    fn test_list_keys_prefix() {
        let table = table_with(&["ab", "abc", "b"]);

        assert_eq!(table.list_keys("ab"), vec!["ab", "abc"]);
        assert_eq!(table.list_keys(""), vec!["ab", "abc", "b"]);
    }

    #[test]
    fn test_list_keys_prefix_longer_than_keys() {
        let table = table_with(&["ab", "abc", "b"]);
        assert!(table.list_keys("abcdef").is_empty());
    }

    #[test]
    fn test_list_keys_multibyte_prefix() {
        let table = table_with(&["é", "ét", "e"]);
        assert_eq!(table.list_keys("é"), vec!["é", "ét"]);
        assert!(table.list_keys("étoile").is_empty());
    }

    #[test]
    fn test_remove() {
        let mut table = table_with(&["a"]);
        assert!(table.remove("a").is_some());
        assert!(table.remove("a").is_none());
        assert!(table.is_empty());
    }
}
