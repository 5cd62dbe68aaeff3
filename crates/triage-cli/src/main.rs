mod cmd;
mod output;
mod root;
mod source;

use clap::{Parser, Subcommand};
use source::IssueSource;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "triage",
    about = "Score, rank, and recommend issues from a backlog",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .triage.yaml or .git/)
    #[arg(long, global = true, env = "TRIAGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Issue snapshot file, JSON or YAML ('-' reads JSON from stdin)
    #[arg(long, global = true, short = 'i')]
    input: Option<PathBuf>,

    /// Fetch issues live via the gh CLI instead of a snapshot file
    #[arg(long, global = true, conflicts_with = "input")]
    gh: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the whole backlog by priority score
    Rank,

    /// Recommend the single highest-priority startable issue
    Next,

    /// Break down one issue's score signal by signal
    Explain {
        /// Issue id
        id: u64,
    },

    /// Show derived dependency edges and per-issue startability
    Deps,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let source = IssueSource::from_args(cli.input.as_deref(), cli.gh);

    let result = match cli.command {
        Commands::Rank => cmd::rank::run(&root, &source, cli.json),
        Commands::Next => cmd::next::run(&root, &source, cli.json),
        Commands::Explain { id } => cmd::explain::run(&root, &source, id, cli.json),
        Commands::Deps => cmd::deps::run(&root, &source, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
