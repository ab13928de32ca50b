use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use conceptmap_editor::ExportMap;

use super::Context;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file produced by `conceptmap export`
    pub file: PathBuf,
}

pub async fn import(args: ImportArgs, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join(&args.file);
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = ExportMap::from_json(&content)?;

    let mut workspace = ctx.open_workspace().await?;
    let result = workspace.import_document(document).await;
    workspace.close(false).await;
    let metadata = result?;

    println!(
        "  {} Imported {} {}",
        "✓".green(),
        metadata.name.bold(),
        metadata.id.dimmed()
    );
    Ok(())
}
