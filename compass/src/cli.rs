//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use clap::{ArgAction, Parser, Subcommand};

use crate::types::Tab;

#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Headless search results client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Search API base URL (default: from config or http://localhost:8000)
    #[arg(long, env = "COMPASS_API", global = true)]
    pub api: Option<String>,

    /// Print the projected view as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a search and print the results page
    Search {
        /// Search query
        query: String,
        /// Tab to show
        #[arg(long, short, value_enum, default_value = "all")]
        tab: Tab,
        /// Number of pages to walk on the paged tabs
        #[arg(long, short, default_value = "1")]
        pages: u32,
        /// Open the detail view for the Nth image (1-based)
        #[arg(long)]
        open: Option<usize>,
    },
    /// Show autocomplete suggestions for a partial input
    Suggest {
        /// Text typed so far
        input: String,
    },
    /// Print the effective configuration
    Config,
}
