// Configuration keys and defaults

pub const SERVER_ADDRESS_PROPERTY: &str = "server.address";
pub const SERVER_PORT_PROPERTY: &str = "server.port";
pub const SERVER_WORKERS_PROPERTY: &str = "server.workers";

pub const LEASE_DURATION_UNIT_PROPERTY: &str = "lease.duration_unit";
pub const LEASE_MAX_DURATION_MS_PROPERTY: &str = "lease.max_duration_ms";

pub const LOGGING_LEVEL_PROPERTY: &str = "logging.level";
pub const LOGGING_CONSOLE_PROPERTY: &str = "logging.console";
pub const LOGGING_FILE_PROPERTY: &str = "logging.file";
pub const LOGGING_DIR_PROPERTY: &str = "logging.dir";

pub const METRICS_ENABLED_PROPERTY: &str = "metrics.enabled";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 9876;
pub const DEFAULT_DURATION_UNIT: &str = "ms";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const ENV_PREFIX: &str = "DISTLOCK";
