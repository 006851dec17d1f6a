use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use supreme_core::Theme;

#[derive(Parser, Debug)]
#[command(name = "supreme")]
#[command(about = "Supreme Nutrition storefront in the terminal")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (defaults to SUPREME_CONFIG_PATH, then supreme.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the cart, favorites and theme files
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the catalog, optionally one category
    Products {
        /// whey, creatina or pre-treino
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Show one product
    Show { id: String },

    /// Search the catalog by name, brand or description
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },

    /// Suggestions for a partial query (popular products when empty)
    Suggest { query: Option<String> },

    /// Shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },

    /// Favorite products
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },

    /// Light/dark theme preference
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CartCommands {
    /// Add one unit of a product
    Add { id: String },
    /// Remove a line
    Remove { id: String },
    /// Set a line's quantity (0 or less removes it)
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// One more unit
    Inc { id: String },
    /// One unit less (removes the line at 1)
    Dec { id: String },
    /// Empty the cart
    Clear,
    /// Print lines and totals
    Show {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavCommands {
    Toggle { id: String },
    List,
    Clear,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommands {
    Show,
    Toggle,
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Write the default settings to a file
    Init {
        #[arg(short, long, default_value = "supreme.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings
    Show,
}
