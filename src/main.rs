use std::sync::Arc;

use strela::{init_logging, network::server, upstream, LoggingConfig, RelayContext, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let _logging = init_logging(LoggingConfig::from_settings(&settings))?;

    let ctx = Arc::new(RelayContext::new(settings));
    let subscriber = tokio::spawn(upstream::run_subscriber(ctx.clone()));

    server::run(ctx, subscriber).await
}
