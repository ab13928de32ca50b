use anyhow::Result;
use clap::Args;
use colored::Colorize;
use conceptmap_workspace::fetch_document;

use super::Context;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Document id
    pub id: String,
}

pub async fn delete(args: DeleteArgs, ctx: &Context) -> Result<()> {
    let name = fetch_document(&ctx.storage(), &args.id).await?.metadata.name;

    let mut workspace = ctx.open_workspace().await?;
    let result = workspace.delete_document(&args.id).await;
    let current = workspace.current_metadata();
    workspace.close(false).await;
    result?;

    println!("  {} Deleted {}", "✓".green(), name);
    println!("  Current document: {} {}", current.name.bold(), current.id.dimmed());
    Ok(())
}
