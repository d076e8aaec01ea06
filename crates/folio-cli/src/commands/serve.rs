use anyhow::Result;
use folio_config::FolioConfig;
use folio_core::PortfolioService;

pub async fn execute(config: FolioConfig, service: PortfolioService) -> Result<()> {
    folio_web::start_server(config, service).await?;
    Ok(())
}
