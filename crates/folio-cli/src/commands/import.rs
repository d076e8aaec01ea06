use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{PortfolioService, ReplaceReport};

use super::read_json;

pub async fn run(service: &PortfolioService, file: &Path) -> Result<ReplaceReport> {
    let candidate = read_json(file)?;
    let report = service
        .replace(&candidate)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;
    Ok(report)
}

pub async fn execute(service: PortfolioService, file: &Path) -> Result<()> {
    let report = run(&service, file).await?;
    println!(
        "Imported {} about paragraphs, {} projects, {} tags",
        report.about, report.projects, report.tags
    );
    Ok(())
}
