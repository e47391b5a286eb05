//! Configuration management for the lock server
//!
//! Sources, lowest precedence first: built-in defaults, the YAML file
//! (`conf/application.yml` unless `--config` says otherwise), `DISTLOCK_*`
//! environment variables, then command line flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};

use distlock_core::DistlockError;

use super::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_DURATION_UNIT, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL,
    DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT, ENV_PREFIX, LEASE_DURATION_UNIT_PROPERTY,
    LEASE_MAX_DURATION_MS_PROPERTY, LOGGING_CONSOLE_PROPERTY, LOGGING_DIR_PROPERTY,
    LOGGING_FILE_PROPERTY, LOGGING_LEVEL_PROPERTY, METRICS_ENABLED_PROPERTY,
    SERVER_ADDRESS_PROPERTY, SERVER_PORT_PROPERTY, SERVER_WORKERS_PROPERTY,
};
use super::lease::{DurationUnit, LeasePolicy};
use crate::startup::LoggingConfig;

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "distlock-server", about = "Advisory lock service with leased sessions")]
pub struct Cli {
    /// Port to listen on
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    /// Address to bind
    #[arg(long = "address")]
    pub address: Option<String>,
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config", env = "DISTLOCK_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process arguments.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> Result<Self, ConfigError> {
        let config_file = args
            .config_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config_builder = Config::builder()
            .set_default(SERVER_ADDRESS_PROPERTY, DEFAULT_SERVER_ADDRESS)?
            .set_default(SERVER_PORT_PROPERTY, i64::from(DEFAULT_SERVER_PORT))?
            .set_default(LEASE_DURATION_UNIT_PROPERTY, DEFAULT_DURATION_UNIT)?
            .set_default(LEASE_MAX_DURATION_MS_PROPERTY, 0_i64)?
            .set_default(LOGGING_LEVEL_PROPERTY, DEFAULT_LOG_LEVEL)?
            .set_default(LOGGING_CONSOLE_PROPERTY, true)?
            .set_default(LOGGING_FILE_PROPERTY, false)?
            .set_default(LOGGING_DIR_PROPERTY, DEFAULT_LOG_DIR)?
            .set_default(METRICS_ENABLED_PROPERTY, true)?
            .add_source(File::from(config_file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT_PROPERTY, i64::from(v))?;
        }
        if let Some(v) = args.address {
            config_builder = config_builder.set_override(SERVER_ADDRESS_PROPERTY, v)?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Worker count for the HTTP server, `None` leaves it to actix.
    pub fn server_workers(&self) -> Option<usize> {
        self.config
            .get_int(SERVER_WORKERS_PROPERTY)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
    }

    // ========================================================================
    // Lease
    // ========================================================================

    pub fn lease_duration_unit(&self) -> Result<DurationUnit, DistlockError> {
        self.config
            .get_string(LEASE_DURATION_UNIT_PROPERTY)
            .unwrap_or(DEFAULT_DURATION_UNIT.to_string())
            .parse()
    }

    /// Longest lease a client may ask for. Zero or negative means unlimited.
    pub fn lease_max_duration(&self) -> Option<Duration> {
        self.config
            .get_int(LEASE_MAX_DURATION_MS_PROPERTY)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v > 0)
            .map(Duration::from_millis)
    }

    pub fn lease_policy(&self) -> Result<LeasePolicy, DistlockError> {
        Ok(LeasePolicy::new(
            self.lease_duration_unit()?,
            self.lease_max_duration(),
        ))
    }

    // ========================================================================
    // Observability
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGGING_DIR_PROPERTY).ok(),
            self.config.get_bool(LOGGING_CONSOLE_PROPERTY).unwrap_or(true),
            self.config.get_bool(LOGGING_FILE_PROPERTY).unwrap_or(false),
            self.config
                .get_string(LOGGING_LEVEL_PROPERTY)
                .unwrap_or(DEFAULT_LOG_LEVEL.to_string()),
        )
    }

    pub fn metrics_enabled(&self) -> bool {
        self.config.get_bool(METRICS_ENABLED_PROPERTY).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli_with_file(path: &std::path::Path) -> Cli {
        Cli {
            config_file: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let configuration =
            Configuration::from_cli(cli_with_file(&dir.path().join("missing.yml"))).unwrap();

        assert_eq!(configuration.server_address(), DEFAULT_SERVER_ADDRESS);
        assert_eq!(configuration.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(configuration.server_workers(), None);
        assert_eq!(
            configuration.lease_duration_unit().unwrap(),
            DurationUnit::Millis
        );
        assert_eq!(configuration.lease_max_duration(), None);
        assert!(configuration.metrics_enabled());
    }

    #[test]
    fn test_values_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(
            file,
            "server:\n  port: 7000\n  workers: 2\nlease:\n  duration_unit: s\n  max_duration_ms: 60000\nmetrics:\n  enabled: false"
        )
        .unwrap();

        let configuration = Configuration::from_cli(cli_with_file(file.path())).unwrap();

        assert_eq!(configuration.server_port(), 7000);
        assert_eq!(configuration.server_workers(), Some(2));
        let policy = configuration.lease_policy().unwrap();
        assert_eq!(policy.unit, DurationUnit::Secs);
        assert_eq!(policy.max_duration, Some(Duration::from_secs(60)));
        assert!(!configuration.metrics_enabled());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 7000\n  address: 10.0.0.1").unwrap();

        let cli = Cli {
            port: Some(7100),
            address: Some("127.0.0.1".to_string()),
            config_file: Some(file.path().to_path_buf()),
        };
        let configuration = Configuration::from_cli(cli).unwrap();

        assert_eq!(configuration.server_port(), 7100);
        assert_eq!(configuration.server_address(), "127.0.0.1");
    }

    #[test]
    fn test_invalid_duration_unit() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "lease:\n  duration_unit: fortnight").unwrap();

        let configuration = Configuration::from_cli(cli_with_file(file.path())).unwrap();
        assert!(matches!(
            configuration.lease_policy(),
            Err(DistlockError::InvalidDurationUnit(_))
        ));
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["distlock-server", "-p", "8080", "--address", "::1"]).unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.address.as_deref(), Some("::1"));
    }
}
