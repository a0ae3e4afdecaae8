use webcastor_core::AppConfigTrait;
use webcastor_http::logging::{init_logging, log_startup_info, LoggingConfig};
use webcastor_http::WebcastorConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = WebcastorConfig::from_env()?;
    config.validate()?;

    init_logging(LoggingConfig::from(&config))?;
    log_startup_info(&config);

    webcastor_http::run(config).await?;

    Ok(())
}
