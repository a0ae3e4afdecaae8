//! Default configuration values

pub struct WebcastorDefaults;

impl WebcastorDefaults {
    pub const HOST: &'static str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const MESSAGE_SIZE_LIMIT: usize = 8000;
    pub const HEALTH_CHECK_PATH: &'static str = "/health";
    pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
    pub const LOG_LEVEL: &'static str = "info";
    pub const LOG_FORMAT: &'static str = "pretty";
}
