use anyhow::Result;
use clap::Args;
use colored::Colorize;
use conceptmap_workspace::reset_app_data;

use super::Context;

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip the confirmation guard
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn reset(args: ResetArgs, ctx: &Context) -> Result<()> {
    if !args.yes {
        println!(
            "{} This deletes every document in {}",
            "⚠️".yellow(),
            ctx.data_dir.display()
        );
        println!("Use --yes to confirm");
        return Ok(());
    }

    let deleted = reset_app_data(&ctx.storage(), &ctx.last_doc()).await?;
    println!("  {} Deleted {} documents", "✓".green(), deleted);
    Ok(())
}
