//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Build, edit and print line-oriented markup documents
#[derive(Parser, Debug)]
#[command(name = "domtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Extra config file merged over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the document as normalized markup
    Render {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the document outline
    Tree {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Relabel every element tagged OLD as NEW
    Replace {
        #[command(flatten)]
        input: InputArgs,
        /// Tag to replace
        #[arg(long)]
        from: String,
        /// Replacement tag
        #[arg(long)]
        to: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Bold every cell of a table row
    BoldRow {
        #[command(flatten)]
        input: InputArgs,
        /// Row number, starting at 1
        #[arg(long)]
        row: usize,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove a tag, keeping its content
    Remove {
        #[command(flatten)]
        input: InputArgs,
        /// Tag to remove
        #[arg(long)]
        tag: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Wrap every occurrence of a word in a tag
    TagWord {
        #[command(flatten)]
        input: InputArgs,
        /// Word to match (case-insensitive)
        #[arg(long)]
        word: String,
        /// Wrapping tag
        #[arg(long)]
        tag: String,
        #[command(flatten)]
        output: OutputArgs,
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

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Markup file, stdin when omitted or '-'
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the result to FILE instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Print the outline instead of markup
    #[arg(long)]
    pub tree: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
