//! CLI definitions for parsnip.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "parsnip",
    version,
    about = "Parse, unparse and check text against a grammar",
    infer_subcommands = true,
    after_help = "Examples:\n  parsnip parse --grammar expr.peg --start Expr input.txt\n  parsnip roundtrip --grammar expr.peg input.txt\n  parsnip check --grammar expr.peg --json < input.txt"
)]
pub struct Cli {
    /// Show engine debug logs.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse the input and print its event tree.
    Parse(Target),
    /// Parse, unparse and re-parse the input, printing the regenerated text.
    Roundtrip(Target),
    /// Parse the input and match the events against the grammar again.
    Check(Target),
}

#[derive(Debug, Args)]
pub struct Target {
    /// Grammar notation file.
    #[arg(long, short)]
    pub grammar: PathBuf,
    /// Production to start from (defaults to the first one defined).
    #[arg(long, short)]
    pub start: Option<String>,
    /// Configuration file (defaults to parsnip.toml next to the grammar).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
    /// Input file; standard input when omitted or `-`.
    pub input: Option<PathBuf>,
}
