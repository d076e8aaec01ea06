use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use folio_cli::{
    cli::{Cli, Commands},
    commands, logging, store,
};
use folio_config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_db_path(cli.db_path.clone());
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Commands::Serve { port } = &cli.command {
        loader = loader.with_port(*port);
    }
    let config = loader.load().context("Failed to load configuration")?;

    logging::init(cli.requested_log_level(), &config.logging);
    debug!(?config, "Configuration loaded");

    // `check` never opens the store
    if let Commands::Check { file } = &cli.command {
        return commands::check::execute(file);
    }

    let service = store::open_service(&config.storage)?;

    match cli.command {
        Commands::Serve { .. } => commands::serve::execute(config, service).await?,
        Commands::Show => commands::show::execute(service).await?,
        Commands::Export { output } => commands::export::execute(service, output).await?,
        Commands::Import { file } => commands::import::execute(service, &file).await?,
        Commands::Check { .. } => {}
    }

    Ok(())
}
