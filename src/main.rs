use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repovet::cli::commands;

#[derive(Parser)]
#[command(name = "repovet")]
#[command(
    version,
    about = "Audit a public GitHub repository with an LLM before adopting it"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a public GitHub repository
    Analyze {
        #[arg(help = "Repository URL, e.g. https://github.com/owner/repo")]
        url: String,
        #[arg(long, help = "Model override for this run")]
        model: Option<String>,
        #[arg(long, help = "Emit the report as JSON")]
        json: bool,
    },

    /// List stored audits, newest first
    History {
        #[arg(short = 'n', long, default_value = "20", help = "Maximum rows")]
        limit: usize,
        #[arg(long, help = "Emit records as JSON")]
        json: bool,
    },

    /// Render one stored audit
    Show {
        #[arg(help = "Audit id (a unique prefix is enough)")]
        id: String,
        #[arg(long, help = "Emit the record as JSON")]
        json: bool,
    },

    /// Delete one stored audit
    Delete {
        #[arg(help = "Audit id (a unique prefix is enough)")]
        id: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Emit as JSON instead of TOML")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize the global config file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Analyze { url, model, json } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::analyze::run(commands::analyze::AnalyzeOptions {
                repo_url: url,
                model,
                json,
            }))?;
        }
        Commands::History { limit, json } => {
            commands::history::run(limit, json)?;
        }
        Commands::Show { id, json } => {
            commands::show::run(&id, json)?;
        }
        Commands::Delete { id } => {
            commands::delete::run(&id)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                commands::config::show(json)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
