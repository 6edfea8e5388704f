//! # hn_digest
//!
//! Scrapes the Hacker News front page and mails a formatted digest of the
//! top stories to a single recipient.
//!
//! ## Usage
//!
//! ```sh
//! FROM_EMAIL=me@gmail.com EMAIL_PASSWORD=app-password TO_EMAIL=me@gmail.com hn_digest
//! ```
//!
//! ## Architecture
//!
//! One sequential pass, stopping at the first failing stage:
//! 1. **Verify**: check the SMTP connection and credentials
//! 2. **Fetch**: download the front page
//! 3. **Extract**: parse up to `stories_limit` stories from the markup
//! 4. **Render & send**: build HTML and plain-text bodies and submit one message
//!
//! The process exits non-zero when any stage fails.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod mailer;
mod models;
mod outputs;
mod scrapers;
mod service;
mod utils;

use cli::Cli;
use config::Settings;
use mailer::{SmtpMailer, StdoutMailer};
use scrapers::hackernews::HttpPageSource;
use service::DigestService;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hn_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Some(path) = &args.write_sample_config {
        return match config::write_sample(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to write sample configuration");
                ExitCode::FAILURE
            }
        };
    }

    // ---- Settings ----
    let mut settings = Settings::load(&args.config);
    if let Some(limit) = args.limit {
        settings.stories_limit = limit;
    }
    info!(?settings, "Resolved settings");

    let source = match HttpPageSource::new() {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    // ---- Run ----
    let ok = if args.dry_run {
        DigestService::new(settings, source, StdoutMailer).run().await
    } else {
        if let Err(e) = settings.validate() {
            error!(error = %e, "Email settings are incomplete");
            info!("Set FROM_EMAIL, EMAIL_PASSWORD and TO_EMAIL, or create a config file (see --write-sample-config)");
            return ExitCode::FAILURE;
        }
        match SmtpMailer::from_settings(&settings) {
            Ok(mailer) => DigestService::new(settings, source, mailer).run().await,
            Err(e) => {
                error!(error = %e, "Failed to configure SMTP transport");
                false
            }
        }
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, success = ok, "Execution complete");

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
