//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Treemap data shaping: hierarchical ids, subtree sums and category-relative color intensity
#[derive(Parser, Debug)]
#[command(name = "treeshade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file, applied over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the annotated hierarchy with ids and subtree sums
    Tree {
        /// Dataset JSON file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// List render-ready tiles, one per leaf
    Tiles {
        /// Dataset JSON file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show per-category value ranges
    Ranges {
        /// Dataset JSON file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show legend entries (color key and base color)
    Legend {
        /// Dataset JSON file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Convert a hex color to RGB
    Color {
        /// Six hex digits, optional leading '#'
        hex: String,
        /// Compose an rgba() value with this alpha
        #[arg(short, long)]
        alpha: Option<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings as TOML
    Show,
    /// Print the global config file location
    Path,
}
