use anyhow::Result;
use colored::Colorize;
use conceptmap_editor::DocumentStorage;

use super::Context;

pub async fn list(ctx: &Context) -> Result<()> {
    let documents = ctx.storage().list().await?;

    if documents.is_empty() {
        println!("{}", "No documents yet".yellow());
        println!("Run {} to create one", "conceptmap new".bright_white());
        return Ok(());
    }

    let current = ctx.last_doc().read().await;

    for document in &documents {
        let marker = if current.as_deref() == Some(document.id.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {}  {}  {}",
            marker,
            document.metadata.name.bold(),
            document.id.dimmed(),
            document.metadata.updated_at.dimmed()
        );
    }

    println!();
    println!("{} documents", documents.len());

    Ok(())
}
