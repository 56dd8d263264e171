//! `examiner import` — Merge scraped past-paper mark schemes into the
//! knowledge file.

use examiner_config::AppConfig;
use std::path::Path;

pub fn run(config: &AppConfig, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let target = &config.knowledge.path;
    let merged = examiner_context::store::import_past_papers(file, target)?;

    println!(
        "✅ Merged {merged} mark-scheme entries from {} into {}",
        file.display(),
        target.display()
    );

    Ok(())
}
