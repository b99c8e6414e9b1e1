//! CLI argument definitions for xmatch

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xmatch")]
#[command(about = "Cross-match two source tables by sky position")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a left table against a right table and write the joined rows
    Match(MatchArgs),

    /// Print the inferred schema and row count of a table
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Closest right row for every left row
    Nearest,
    /// Every right row within --max-separation
    Radius,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CollisionArg {
    /// Fail if a column name exists in both tables
    Reject,
    /// Prepend --left-tag / --right-tag to clashing names
    Prefix,
    /// Append --left-tag / --right-tag to clashing names
    Suffix,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Left (source) table; every output row comes from one of its rows
    #[arg(long)]
    pub left: PathBuf,

    /// Right (target) table, indexed for the search
    #[arg(long)]
    pub right: PathBuf,

    /// JSON configuration file (replaces the column and policy flags)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RA column of the left table (degrees)
    #[arg(long, default_value = "ra")]
    pub ra_left: String,

    /// Dec column of the left table (degrees)
    #[arg(long, default_value = "dec")]
    pub dec_left: String,

    /// RA column of the right table (degrees)
    #[arg(long, default_value = "ra")]
    pub ra_right: String,

    /// Dec column of the right table (degrees)
    #[arg(long, default_value = "dec")]
    pub dec_right: String,

    /// Matching mode
    #[arg(long, value_enum, default_value = "nearest")]
    pub mode: ModeArg,

    /// Search radius in arcseconds (radius mode)
    #[arg(long)]
    pub max_separation: Option<f64>,

    /// Keep pairs separated by at most this many arcseconds
    #[arg(long, required_unless_present = "config")]
    pub threshold: Option<f64>,

    /// How to resolve column names present in both tables
    #[arg(long, value_enum, required_unless_present = "config")]
    pub collision: Option<CollisionArg>,

    /// Tag applied to clashing left column names
    #[arg(long, default_value = "a_")]
    pub left_tag: String,

    /// Tag applied to clashing right column names
    #[arg(long, default_value = "b_")]
    pub right_tag: String,

    /// Emit unmatched left rows with empty right columns
    #[arg(long)]
    pub keep_unmatched: bool,

    /// Field delimiter of input and CSV output
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Output file (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Print separation statistics to stderr
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Table to inspect
    pub path: PathBuf,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Also print the first N rows
    #[arg(long)]
    pub head: Option<usize>,
}
