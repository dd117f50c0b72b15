use boulders_edge::bootstrap::config::{load_effective_config, ConfigSource, CONFIG_PATH_ENV};
use boulders_edge::bootstrap::tracing::init_tracing_subscriber;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = load_effective_config()?;
    init_tracing_subscriber(config.server.log_dir.as_deref())?;

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "configuration loaded"),
        ConfigSource::Defaults => warn!(
            env = CONFIG_PATH_ENV,
            "no configuration file found, using defaults"
        ),
    }

    boulders_edge::serve(config).await
}
