//! `triples`: resolve and inspect target triple descriptors.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::OutputFormat;
use config::TriplesConfig;

#[derive(Parser)]
#[command(
    name = "triples",
    version,
    about = "Resolve target triple descriptors from YAML fragments"
)]
struct Cli {
    /// Fragment directory (default: [fragments] root in triples.toml, else ./triples)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Fragment merged beneath every triple (e.g., misc/default)
    #[arg(long, global = true)]
    prelude: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List canonical triples with their aliases and variants
    List,
    /// Print the merged descriptor of a triple
    Resolve {
        /// Canonical name or alias
        name: String,
        /// Apply one of the triple's variants
        #[arg(long)]
        variant: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List the variants a triple declares
    Variants {
        /// Canonical name or alias
        name: String,
    },
    /// Validate triples and their variants (all when none are named)
    Validate {
        /// Canonical names or aliases
        names: Vec<String>,
    },
    /// Show the fragments merged into a triple, base first
    Chain {
        /// Canonical name or alias
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, config_dir) = match TriplesConfig::find_and_load(&cwd)? {
        Some((config, dir)) => (config, dir),
        None => (TriplesConfig::default(), cwd),
    };

    let filter = config.log_filter(cli.verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = config.settings(&config_dir, cli.root, cli.prelude);
    let session = commands::open_session(&settings)?;

    match cli.command {
        Commands::List => commands::list::run(&session),
        Commands::Resolve {
            name,
            variant,
            format,
        } => commands::resolve::run(&session, &name, variant.as_deref(), format),
        Commands::Variants { name } => commands::variants::run(&session, &name),
        Commands::Validate { names } => commands::validate::run(&session, &names),
        Commands::Chain { name } => commands::chain::run(&session, &name),
    }
}
