use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use workerform_core::bundle;

pub async fn hash(dir: &Path) -> Result<()> {
    let loaded = bundle::load(dir)
        .await
        .with_context(|| format!("Failed to hash {}", dir.display()))?;

    for module in &loaded.modules {
        println!(
            "{}  {:<10} {}",
            &module.digest[..16],
            module.file.kind.to_string().dimmed(),
            module.file.filename
        );
    }
    if loaded.modules.is_empty() {
        println!("{}", "No recognized modules found.".yellow());
    }
    println!("{}: {}", "Bundle".cyan(), loaded.digest);
    Ok(())
}
