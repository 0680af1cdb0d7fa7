use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kliping::app::AppContext;
use kliping::cli::{commands, Cli, Commands};
use kliping::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kliping=info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Crawl(args) => {
            commands::crawl(&ctx, args.fresh).await?;
        }
        Commands::Status => {
            commands::status(&ctx)?;
        }
        Commands::Verify => {
            let report = commands::verify(&ctx)?;
            if report.failures() > 0 {
                anyhow::bail!("{} stored images failed verification", report.failures());
            }
        }
        Commands::Reset => {
            commands::reset(&ctx)?;
        }
    }

    Ok(())
}
