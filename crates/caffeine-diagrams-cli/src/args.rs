//! Command-line argument definitions for the Caffeine Diagrams CLI.
//!
//! Every argument is optional: without any, the four diagrams are written as
//! PNG files into the default output directory.

use clap::Parser;

use caffeine_diagrams::config::OutputFormat;

/// Command-line arguments for the Caffeine diagram generator
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the images are written to, created when missing
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Image formats to write (png, svg); repeat or separate with commas
    #[arg(short, long = "format", value_delimiter = ',')]
    pub formats: Vec<OutputFormat>,

    /// Also write a `diagrams.json` manifest next to the images
    #[arg(long)]
    pub manifest: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
