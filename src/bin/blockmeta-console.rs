use anyhow::Result;
use blockmeta_console::config;
use blockmeta_console::mode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // logs go to stderr so they don't interleave with the console on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blockmeta_console=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_PATH.to_string());
    let cfg = config::ConsoleConfig::load(&path)?;

    mode::console::run(cfg).await
}
