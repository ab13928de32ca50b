use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use conceptmap_editor::{DocumentStorage, DocumentStore};

use super::Context;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Document name (defaults to "Map <date>")
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn new(args: NewArgs, ctx: &Context) -> Result<()> {
    let mut store = DocumentStore::with_history_limit(ctx.config.history_limit);
    store.new_document(args.name.as_deref());

    let document = store
        .export()
        .ok_or_else(|| anyhow!("New document has no id"))?;
    ctx.storage().put(&document).await?;
    ctx.last_doc().write(&document.id).await?;

    println!(
        "  {} Created {} {}",
        "✓".green(),
        document.metadata.name.bold(),
        document.id.dimmed()
    );

    Ok(())
}
