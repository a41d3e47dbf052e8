use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(cmdtree::cli::LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    cmdtree::cli::run()
}
