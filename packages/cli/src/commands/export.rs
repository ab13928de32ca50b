use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use conceptmap_workspace::fetch_document;

use super::Context;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document id
    pub id: String,

    /// Output file (defaults to "<name>.json" in the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub async fn export(args: ExportArgs, ctx: &Context) -> Result<()> {
    let document = fetch_document(&ctx.storage(), &args.id).await?;
    let json = document.to_json_pretty()?;

    if args.stdout {
        println!("{}", json);
        return Ok(());
    }

    let out = args
        .out
        .unwrap_or_else(|| ctx.cwd.join(document.export_file_name()));
    tokio::fs::write(&out, json).await?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        document.metadata.name,
        out.display()
    );
    Ok(())
}
