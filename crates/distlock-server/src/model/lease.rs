//! Lease duration parsing
//!
//! Request paths carry a bare integer lease duration. Its unit is a
//! deployment setting (`lease.duration_unit`): `ns`, `ms` or `s`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use distlock_core::DistlockError;

/// Unit of the integer durations accepted on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationUnit {
    /// Nanoseconds, accepted for clients that send raw `Duration` values
    Nanos,
    #[default]
    Millis,
    Secs,
}

impl DurationUnit {
    pub fn to_duration(self, magnitude: u64) -> Duration {
        match self {
            Self::Nanos => Duration::from_nanos(magnitude),
            Self::Millis => Duration::from_millis(magnitude),
            Self::Secs => Duration::from_secs(magnitude),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = DistlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ns" | "nanos" | "nanoseconds" => Ok(Self::Nanos),
            "ms" | "millis" | "milliseconds" => Ok(Self::Millis),
            "s" | "secs" | "seconds" => Ok(Self::Secs),
            _ => Err(DistlockError::InvalidDurationUnit(s.to_string())),
        }
    }
}

impl Display for DurationUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nanos => write!(f, "ns"),
            Self::Millis => write!(f, "ms"),
            Self::Secs => write!(f, "s"),
        }
    }
}

/// How raw lease durations from requests become [`Duration`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeasePolicy {
    pub unit: DurationUnit,
    /// Upper bound for a single lease, `None` for unlimited
    pub max_duration: Option<Duration>,
}

impl LeasePolicy {
    pub fn new(unit: DurationUnit, max_duration: Option<Duration>) -> Self {
        Self { unit, max_duration }
    }

    /// Parse a path segment into a lease duration.
    ///
    /// Rejects anything that is not a positive integer and anything above
    /// the configured maximum.
    pub fn parse(&self, raw: &str) -> Result<Duration, DistlockError> {
        let magnitude: u64 = raw
            .parse()
            .map_err(|e| DistlockError::InvalidDuration(format!("'{}': {}", raw, e)))?;
        if magnitude == 0 {
            return Err(DistlockError::InvalidDuration(
                "duration must be greater than zero".to_string(),
            ));
        }

        let duration = self.unit.to_duration(magnitude);
        if let Some(max) = self.max_duration
            && duration > max
        {
            return Err(DistlockError::DurationOutOfRange {
                requested_ms: duration.as_millis(),
                max_ms: max.as_millis(),
            });
        }

        Ok(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_unit_from_str() {
        assert_eq!("ns".parse::<DurationUnit>().unwrap(), DurationUnit::Nanos);
        assert_eq!("MS".parse::<DurationUnit>().unwrap(), DurationUnit::Millis);
        assert_eq!("seconds".parse::<DurationUnit>().unwrap(), DurationUnit::Secs);
        assert!(matches!(
            "h".parse::<DurationUnit>(),
            Err(DistlockError::InvalidDurationUnit(_))
        ));
    }

    #[test]
    fn test_parse_units() {
        let millis = LeasePolicy::default();
        assert_eq!(millis.parse("1500").unwrap(), Duration::from_millis(1500));

        let secs = LeasePolicy::new(DurationUnit::Secs, None);
        assert_eq!(secs.parse("30").unwrap(), Duration::from_secs(30));

        let nanos = LeasePolicy::new(DurationUnit::Nanos, None);
        assert_eq!(nanos.parse("1000000").unwrap(), Duration::from_millis(1));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let policy = LeasePolicy::default();
        for raw in ["abc", "", "-5", "1.5", " 10", "10s"] {
            assert!(
                matches!(policy.parse(raw), Err(DistlockError::InvalidDuration(_))),
                "expected '{}' to be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!(matches!(
            LeasePolicy::default().parse("0"),
            Err(DistlockError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_parse_enforces_maximum() {
        let policy = LeasePolicy::new(DurationUnit::Millis, Some(Duration::from_secs(60)));
        assert!(policy.parse("60000").is_ok());
        assert_eq!(
            policy.parse("60001"),
            Err(DistlockError::DurationOutOfRange {
                requested_ms: 60001,
                max_ms: 60000,
            })
        );
    }
}
