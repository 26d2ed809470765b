use clap::Parser;
use memos_session_cli::{build_adapter, run, Cli};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    info!(api_url = %config.api_url, storage = %config.storage_path.display(), "Starting");

    let (adapter, reload) = build_adapter(&config)?;
    let mut stdout = std::io::stdout();
    run(cli.command, &adapter, &reload, &mut stdout).await
}
