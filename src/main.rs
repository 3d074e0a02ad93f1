use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabserve::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabserve=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref(), cli.sessions_dir)?;

    match cli.command {
        Commands::Serve { port, host } => {
            cli::serve(config, port, host).await?;
        }
        Commands::Predict { session, features } => {
            cli::predict(&config, &session, &features)?;
        }
        Commands::Features { session } => {
            cli::features(&config, &session)?;
        }
        Commands::Export { session, output } => {
            cli::export(&config, &session, output)?;
        }
        Commands::List { verbose } => {
            cli::list(&config, verbose)?;
        }
    }

    Ok(())
}
