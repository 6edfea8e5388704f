//! Digest delivery over SMTP.
//!
//! # Architecture
//!
//! - [`Mailer`]: Trait the run is written against
//! - [`SmtpMailer`]: Authenticated submission through `lettre`
//! - [`StdoutMailer`]: Prints the plain-text body instead of sending (`--dry-run`)
//!
//! The HTML and plain-text bodies travel as a single
//! `multipart/alternative` message, so a digest is either submitted whole
//! or not at all.

use crate::config::Settings;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use std::fmt;
use tracing::{debug, info, instrument};

/// Display name on the `From:` header.
pub const SENDER_NAME: &str = "Tech News Scraper";

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// A rendered digest ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Something that can deliver an [`OutgoingMessage`].
pub trait Mailer {
    /// Check that the mail server is reachable and accepts our credentials.
    async fn verify(&self) -> Result<(), Box<dyn Error>>;

    /// Submit the message and return the server's reply text.
    async fn send(&self, message: &OutgoingMessage) -> Result<String, Box<dyn Error>>;
}

/// [`Mailer`] that submits to an SMTP server.
///
/// Port 465 uses implicit TLS, every other port negotiates STARTTLS. The
/// sender address doubles as the SMTP username.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    server: String,
    port: u16,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from", &self.from.to_string())
            .finish()
    }
}

impl SmtpMailer {
    /// Build a mailer from resolved settings. Does not connect.
    pub fn from_settings(settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), settings.from_email.parse()?);
        let credentials = Credentials::new(
            settings.from_email.clone(),
            settings.email_password.clone(),
        );

        let builder = if settings.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)?
        };
        let transport = builder
            .port(settings.smtp_port)
            .credentials(credentials)
            .build();

        debug!(server = %settings.smtp_server, port = settings.smtp_port, "SMTP transport configured");
        Ok(Self {
            transport,
            from,
            server: settings.smtp_server.clone(),
            port: settings.smtp_port,
        })
    }
}

impl Mailer for SmtpMailer {
    #[instrument(level = "info", skip_all, fields(server = %self.server, port = self.port))]
    async fn verify(&self) -> Result<(), Box<dyn Error>> {
        if self.transport.test_connection().await? {
            info!("SMTP connection verified");
            Ok(())
        } else {
            Err(format!("SMTP server {}:{} refused the connection", self.server, self.port).into())
        }
    }

    #[instrument(level = "info", skip_all, fields(to = %message.to))]
    async fn send(&self, message: &OutgoingMessage) -> Result<String, Box<dyn Error>> {
        let email = build_message(self.from.clone(), message)?;
        let response = self.transport.send(email).await?;
        let reply = response.message().collect::<Vec<_>>().join(" ");
        info!(code = %response.code(), %reply, "Message accepted by SMTP server");
        Ok(reply)
    }
}

/// [`Mailer`] that writes the plain-text body to stdout.
#[derive(Debug, Default)]
pub struct StdoutMailer;

impl Mailer for StdoutMailer {
    async fn verify(&self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<String, Box<dyn Error>> {
        println!("To: {}\nSubject: {}\n\n{}", message.to, message.subject, message.text);
        Ok("dry run; nothing sent".to_string())
    }
}

/// Assemble the MIME message: plain text first, HTML as the preferred part.
fn build_message(from: Mailbox, message: &OutgoingMessage) -> Result<Message, Box<dyn Error>> {
    let to: Mailbox = message.to.parse()?;
    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))?;
    Ok(email)
}
