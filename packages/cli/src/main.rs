mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    delete, export, import, list, new, rename, reset, show, Context, DeleteArgs, ExportArgs,
    ImportArgs, NewArgs, RenameArgs, ResetArgs, ShowArgs,
};
use tracing_subscriber::EnvFilter;

/// ConceptMap CLI - manage stored concept maps from the terminal
#[derive(Parser, Debug)]
#[command(name = "conceptmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored documents, most recent first
    List,

    /// Create a new document and make it current
    New(NewArgs),

    /// Print a document outline
    Show(ShowArgs),

    /// Rename a document
    Rename(RenameArgs),

    /// Write a document as pretty JSON
    Export(ExportArgs),

    /// Store a JSON export and make it current
    Import(ImportArgs),

    /// Delete a stored document
    Delete(DeleteArgs),

    /// Delete every stored document
    Reset(ResetArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let ctx = Context::load(cwd, cli.data_dir)?;

    match cli.command {
        Command::List => list(&ctx).await,
        Command::New(args) => new(args, &ctx).await,
        Command::Show(args) => show(args, &ctx).await,
        Command::Rename(args) => rename(args, &ctx).await,
        Command::Export(args) => export(args, &ctx).await,
        Command::Import(args) => import(args, &ctx).await,
        Command::Delete(args) => delete(args, &ctx).await,
        Command::Reset(args) => reset(args, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
