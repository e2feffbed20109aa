//! # Facetsync CLI
//!
//! Runs a single connector against JSON inputs, outside of any UI host.
//! Useful to check what a widget would render, or how a click would change
//! the URL state.
//!
//! ## Commands
//!
//! - `facetsync props` - Props the component would receive
//! - `facetsync refine <value>` - Search state after a refinement
//! - `facetsync clean-up` - Search state after the widget unmounts
//! - `facetsync params` - Search parameters contributed by the widget
//! - `facetsync metadata` - Active-refinement summary
//! - `facetsync search-facet <query>` - Facet-value search request
//!
//! ## Example Usage
//!
//! ```bash
//! # What does the brand menu show for this URL state?
//! facetsync props -w menu.json -s state.json -i products -r results.json
//!
//! # Move to page 3 of the second index of a multi-index page
//! facetsync refine 3 -w pagination.json -i reviews --multi
//! ```

mod app;
mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Facetsync - search widget connectors
#[derive(Parser)]
#[command(name = "facetsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Inputs {
    /// Widget description (JSON file)
    #[arg(short, long)]
    pub widget: PathBuf,

    /// Search state (JSON file); an empty state when omitted
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Widget context (JSON file)
    #[arg(long, conflicts_with = "index")]
    pub context: Option<PathBuf>,

    /// Index the widget targets, instead of a context file
    #[arg(short, long)]
    pub index: Option<String>,

    /// Scope the widget's state under `indices.<index>`
    #[arg(long, requires = "index")]
    pub multi: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the props the component would receive
    Props {
        #[command(flatten)]
        inputs: Inputs,

        /// Search results (JSON file); no results yet when omitted
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Facet-value search results (JSON file)
        #[arg(short, long)]
        facet_search: Option<PathBuf>,
    },

    /// Print the search state after a refinement
    Refine {
        #[command(flatten)]
        inputs: Inputs,

        /// Refinement value, as JSON (`3`, `null`) or bare text
        value: String,
    },

    /// Print the search state after the widget unmounts
    CleanUp {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Print the search parameters contributed by the widget
    Params {
        #[command(flatten)]
        inputs: Inputs,

        /// Parameters to start from (JSON file)
        #[arg(short, long)]
        base: Option<PathBuf>,
    },

    /// Print the active-refinement summary
    Metadata {
        #[command(flatten)]
        inputs: Inputs,

        /// Print the state with the n-th item cleared instead
        #[arg(long)]
        clear: Option<usize>,
    },

    /// Print the facet-value search request for a query
    SearchFacet {
        #[command(flatten)]
        inputs: Inputs,

        /// Text typed into the search box
        query: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => facetsync_core::Config::load_from(path)?,
        None => facetsync_core::Config::load()?,
    };

    // Setup logging; stdout is reserved for JSON
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Props {
            inputs,
            results,
            facet_search,
        } => commands::props::run(config, &inputs, results, facet_search),
        Commands::Refine { inputs, value } => commands::refine::run(config, &inputs, &value),
        Commands::CleanUp { inputs } => commands::clean_up::run(config, &inputs),
        Commands::Params { inputs, base } => commands::params::run(config, &inputs, base),
        Commands::Metadata { inputs, clear } => commands::metadata::run(config, &inputs, clear),
        Commands::SearchFacet { inputs, query } => {
            commands::search_facet::run(config, &inputs, &query)
        }
    }
}
