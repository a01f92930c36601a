use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(
    name = "appraise",
    version,
    about = "Plan-and-execute text evaluation with judged verdicts"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a text and print the report
    Analyze(AnalyzeArgs),
    /// List the registered checks
    Checks(ChecksArgs),
    /// Print the criteria document for a check
    Criteria(CriteriaArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Text to analyze; reads stdin when neither TEXT nor --file is given
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the markdown report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Judge variant to use
    #[arg(long, value_parser = ["rules", "react"])]
    pub judge: Option<String>,

    /// Model name for the react judge
    #[arg(long)]
    pub model: Option<String>,

    /// Run every step even after a critical verdict
    #[arg(long)]
    pub no_early_exit: bool,
}

#[derive(Parser, Debug)]
pub struct ChecksArgs {
    /// Emit machine-readable JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CriteriaArgs {
    /// Check name, e.g. length_check
    pub name: String,

    /// Configuration file (YAML), used for the criteria directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
