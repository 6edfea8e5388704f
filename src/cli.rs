//! Command-line interface definitions for hn_digest.
//!
//! SMTP settings come from the environment and the config file (see
//! [`crate::config`]); the flags here only pick the file and adjust a run.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for hn_digest.
///
/// # Examples
///
/// ```sh
/// # Send the digest using ./config.json and/or environment variables
/// hn_digest
///
/// # Preview the top 5 stories without sending anything
/// hn_digest --dry-run --limit 5
///
/// # Write a sample settings file
/// hn_digest --write-sample-config config.sample.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Settings file (JSON, or YAML for .yaml/.yml); its values override the environment
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Number of stories to include, overriding STORIES_LIMIT and the config file
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the plain-text digest to stdout instead of mailing it
    #[arg(long)]
    pub dry_run: bool,

    /// Write a sample settings file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_sample_config: Option<PathBuf>,
}
