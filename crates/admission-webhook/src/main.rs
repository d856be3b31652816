use admission_webhook::{
    cli, config::Config, strategy::AllowAll, tracing::setup_tracing, AdmissionWebhook,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;

    warn!("no admission strategy configured, every request is going to be allowed");
    let webhook = AdmissionWebhook::new_from_config(config, Arc::new(AllowAll));

    webhook.run().await
}
