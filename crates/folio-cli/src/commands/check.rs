use std::path::Path;

use anyhow::{bail, Result};
use folio_core::validate;

use super::read_json;

pub fn execute(file: &Path) -> Result<()> {
    let candidate = read_json(file)?;

    match validate(&candidate) {
        Ok(document) => {
            println!(
                "{}: ok ({} about paragraphs, {} projects)",
                file.display(),
                document.about.len(),
                document.projects.len()
            );
            Ok(())
        }
        Err(e) => bail!("{}: {}", file.display(), e),
    }
}
