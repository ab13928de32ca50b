use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use conceptmap_workspace::fetch_document;

use super::Context;

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Document id
    pub id: String,

    /// New name
    pub name: String,
}

pub async fn rename(args: RenameArgs, ctx: &Context) -> Result<()> {
    let previous = fetch_document(&ctx.storage(), &args.id).await?.metadata.name;

    let mut workspace = ctx.open_workspace().await?;
    workspace.switch_document(&args.id).await?;

    let renamed = workspace.store().update(|store| store.rename_document(&args.name));
    if !renamed {
        workspace.close(false).await;
        return Err(anyhow!("Name cannot be blank"));
    }

    let name = workspace.current_metadata().name;
    workspace.close(true).await;

    println!("  {} {} → {}", "✓".green(), previous, name.bold());
    Ok(())
}
