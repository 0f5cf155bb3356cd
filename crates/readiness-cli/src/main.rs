mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{assessment::AssessmentSubcommand, catalog::CatalogSubcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "readiness",
    about = "AI readiness assessments: questionnaire catalog, scoring, reports and HTTP server",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .readiness/)
    #[arg(long, global = true, env = "READINESS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .readiness/ with default config and an empty database
    Init,

    /// Inspect or check the questionnaire
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Score an answers file (question id → answer) without saving anything
    Score {
        /// YAML or JSON map of question id to selected option
        file: PathBuf,
    },

    /// Browse stored assessments
    Assessment {
        #[command(subcommand)]
        subcommand: AssessmentSubcommand,
    },

    /// Print or export the report of a completed assessment
    Report {
        /// Assessment id
        id: Uuid,
        /// Write to this file instead of stdout (.pdf for PDF, anything else for Markdown)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Run the HTTP server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
        /// Open a browser once listening
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Catalog { subcommand } => cmd::catalog::run(&root, subcommand, cli.json),
        Commands::Score { file } => cmd::score::run(&root, &file, cli.json),
        Commands::Assessment { subcommand } => cmd::assessment::run(&root, subcommand, cli.json),
        Commands::Report { id, out } => cmd::report::run(&root, id, out.as_deref()),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
