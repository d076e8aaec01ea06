use anyhow::{Context, Result};
use folio_core::PortfolioService;

/// Presented document as pretty JSON
pub async fn render(service: &PortfolioService) -> Result<String> {
    let document = service
        .load_presented()
        .await
        .context("Failed to read data")?;
    Ok(serde_json::to_string_pretty(&document)?)
}

pub async fn execute(service: PortfolioService) -> Result<()> {
    println!("{}", render(&service).await?);
    Ok(())
}
