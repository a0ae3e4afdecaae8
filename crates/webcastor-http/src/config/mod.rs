pub mod defaults;
pub mod server_config;

pub use defaults::WebcastorDefaults;
pub use server_config::WebcastorConfig;
