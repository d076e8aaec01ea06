use std::path::PathBuf;

use anyhow::{Context, Result};
use folio_core::{Document, PortfolioService};
use tracing::info;

/// Stored document as JSON, without the reader-facing placeholders, so an
/// export can be imported back unchanged
pub async fn render(service: &PortfolioService) -> Result<String> {
    let document = service
        .load()
        .await
        .context("Failed to read data")?
        .unwrap_or_else(|| Document::new("", ""));
    Ok(serde_json::to_string_pretty(&document)?)
}

pub async fn execute(service: PortfolioService, output: Option<PathBuf>) -> Result<()> {
    let json = render(&service).await?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Exported portfolio");
        }
        None => println!("{json}"),
    }
    Ok(())
}
