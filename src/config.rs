//! Runtime settings: SMTP account, recipient, and story limit.
//!
//! Settings are resolved in two layers:
//!
//! 1. **Environment**: `SMTP_SERVER`, `SMTP_PORT`, `FROM_EMAIL`,
//!    `EMAIL_PASSWORD`, `TO_EMAIL`, `STORIES_LIMIT`, each with a default
//! 2. **File** (optional): a JSON or YAML document with camelCase keys
//!    (`smtpServer`, `smtpPort`, `fromEmail`, `emailPassword`, `toEmail`,
//!    `storiesLimit`). Every key present in the file overrides the
//!    environment value.
//!
//! A missing file is not an error. A file that cannot be read or parsed is
//! logged and ignored, leaving the environment values in place.

use crate::utils::redact;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_STORIES_LIMIT: usize = 10;

/// Fully resolved settings for one run.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// SMTP host to submit the digest to.
    pub smtp_server: String,
    /// SMTP port. 465 means implicit TLS, anything else STARTTLS.
    pub smtp_port: u16,
    /// Sender address, also used as the SMTP username.
    pub from_email: String,
    /// SMTP password (an app password for Gmail).
    pub email_password: String,
    /// Recipient of the digest.
    pub to_email: String,
    /// Maximum number of stories to include.
    pub stories_limit: usize,
}

/// Settings as they may appear in a config file. Absent keys keep the
/// environment value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    smtp_server: Option<String>,
    smtp_port: Option<u16>,
    from_email: Option<String>,
    email_password: Option<String>,
    to_email: Option<String>,
    stories_limit: Option<usize>,
}

/// Reasons settings cannot be used to send a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSender,
    MissingRecipient,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSender => {
                write!(f, "sender address is not set (FROM_EMAIL or fromEmail)")
            }
            ConfigError::MissingRecipient => {
                write!(f, "recipient address is not set (TO_EMAIL or toEmail)")
            }
        }
    }
}

impl Error for ConfigError {}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("from_email", &self.from_email)
            .field("email_password", &redact(&self.email_password))
            .field("to_email", &self.to_email)
            .field("stories_limit", &self.stories_limit)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a variable lookup, applying defaults.
    ///
    /// Numeric values that are missing, unparsable or zero fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            smtp_server: lookup("SMTP_SERVER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port: positive(lookup("SMTP_PORT")).unwrap_or(DEFAULT_SMTP_PORT),
            from_email: lookup("FROM_EMAIL").unwrap_or_default(),
            email_password: lookup("EMAIL_PASSWORD").unwrap_or_default(),
            to_email: lookup("TO_EMAIL").unwrap_or_default(),
            stories_limit: positive(lookup("STORIES_LIMIT")).unwrap_or(DEFAULT_STORIES_LIMIT),
        }
    }

    /// Resolve settings from the environment, then let `path` override them.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Self {
        let mut settings = Self::from_env();

        if !path.exists() {
            debug!("No configuration file; using environment settings");
            return settings;
        }

        match read_settings_file(path) {
            Ok(file) => {
                settings.apply(file);
                info!("Loaded configuration file");
            }
            Err(e) => {
                warn!(error = %e, "Failed to load configuration file; using environment settings");
            }
        }
        settings
    }

    /// Check that the settings can address a message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.from_email.trim().is_empty() {
            return Err(ConfigError::MissingSender);
        }
        if self.to_email.trim().is_empty() {
            return Err(ConfigError::MissingRecipient);
        }
        Ok(())
    }

    /// Placeholder settings written by `--write-sample-config`.
    pub fn sample() -> Self {
        Self {
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_email: "your_email@gmail.com".to_string(),
            email_password: "your_app_password".to_string(),
            to_email: "recipient@gmail.com".to_string(),
            stories_limit: DEFAULT_STORIES_LIMIT,
        }
    }

    fn apply(&mut self, file: SettingsFile) {
        if let Some(v) = file.smtp_server {
            self.smtp_server = v;
        }
        if let Some(v) = file.smtp_port {
            self.smtp_port = v;
        }
        if let Some(v) = file.from_email {
            self.from_email = v;
        }
        if let Some(v) = file.email_password {
            self.email_password = v;
        }
        if let Some(v) = file.to_email {
            self.to_email = v;
        }
        if let Some(v) = file.stories_limit {
            self.stories_limit = v;
        }
    }
}

/// Write [`Settings::sample`] to `path`, as YAML for `.yaml`/`.yml` and
/// pretty-printed JSON otherwise.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_sample(path: &Path) -> Result<(), Box<dyn Error>> {
    let sample = Settings::sample();
    let body = if is_yaml(path) {
        serde_yaml::to_string(&sample)?
    } else {
        serde_json::to_string_pretty(&sample)?
    };
    fs::write(path, body)?;
    info!("Wrote sample configuration");
    Ok(())
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let file = if is_yaml(path) {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    Ok(file)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn positive<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}
