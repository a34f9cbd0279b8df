use bookshelf_mcp::config::{StoreConfig, DEFAULT_LOG_FILTER};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdoutはMCPのstdioトランスポートが使うため、ログはstderrへ
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StoreConfig::from_env();
    tracing::info!(store = %config.path.display(), "starting bookshelf-mcp");

    bookshelf_mcp::interface::mcp::run(config).await
}
