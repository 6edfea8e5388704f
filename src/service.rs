//! One digest run: verify the mail server, fetch, extract, render, send.
//!
//! Every stage short-circuits the run on failure. Failures are logged and
//! folded into a `false` result by [`DigestService::run`]; nothing is
//! retried and nothing escapes as a panic.

use crate::config::Settings;
use crate::mailer::{Mailer, OutgoingMessage};
use crate::outputs::html::render_html;
use crate::outputs::subject_line;
use crate::outputs::text::render_text;
use crate::scrapers::hackernews::{PageSource, extract_stories};
use crate::utils::{timestamp_label, truncate_for_log};
use chrono::Local;
use std::error::Error;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

/// Why a run did not deliver a digest.
#[derive(Debug)]
pub enum RunError {
    MailerUnavailable(Box<dyn Error>),
    Fetch(Box<dyn Error>),
    NoStories,
    Send(Box<dyn Error>),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::MailerUnavailable(e) => write!(f, "mail server check failed: {e}"),
            RunError::Fetch(e) => write!(f, "fetching the front page failed: {e}"),
            RunError::NoStories => write!(f, "no stories found on the front page"),
            RunError::Send(e) => write!(f, "sending the digest failed: {e}"),
        }
    }
}

impl Error for RunError {}

/// Wires a page source and a mailer together for one run.
#[derive(Debug)]
pub struct DigestService<S, M> {
    settings: Settings,
    source: S,
    mailer: M,
}

impl<S, M> DigestService<S, M>
where
    S: PageSource,
    M: Mailer,
{
    pub fn new(settings: Settings, source: S, mailer: M) -> Self {
        Self {
            settings,
            source,
            mailer,
        }
    }

    /// Run once. Returns `true` only if a digest was handed to the mailer.
    #[instrument(level = "info", skip_all, fields(limit = self.settings.stories_limit))]
    pub async fn run(&self) -> bool {
        match self.try_run().await {
            Ok(count) => {
                info!(count, recipient = %self.settings.to_email, "Digest run complete");
                true
            }
            Err(e) => {
                if let RunError::MailerUnavailable(_) = e {
                    warn!("For Gmail, enable 2-step verification and use an app password as EMAIL_PASSWORD");
                }
                error!(error = %e, "Digest run failed");
                false
            }
        }
    }

    /// Run once and report the number of stories sent.
    pub async fn try_run(&self) -> Result<usize, RunError> {
        self.mailer
            .verify()
            .await
            .map_err(RunError::MailerUnavailable)?;

        let html = self.source.fetch_page().await.map_err(RunError::Fetch)?;

        let stories = extract_stories(&html, self.settings.stories_limit);
        if stories.is_empty() {
            debug!(preview = %truncate_for_log(&html, 300), "Page yielded no stories");
            return Err(RunError::NoStories);
        }

        let generated_at = Local::now().naive_local();
        let message = OutgoingMessage {
            to: self.settings.to_email.clone(),
            subject: subject_line(&generated_at),
            text: render_text(&stories, &generated_at),
            html: render_html(&stories, &generated_at),
        };

        let reply = self.mailer.send(&message).await.map_err(RunError::Send)?;
        info!(
            count = stories.len(),
            recipient = %message.to,
            at = %timestamp_label(&generated_at),
            %reply,
            "Digest sent"
        );
        Ok(stories.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    const PAGE: &str = r#"<html><body><table>
        <tr class="athing" id="1"><td class="title"><span class="titleline"><a href="item?id=1">Foo</a></span></td></tr>
        <tr><td class="subtext"><span class="score">10 points</span> by <a class="hnuser">alice</a> | <a href="item?id=1">10&nbsp;comments</a></td></tr>
        <tr class="athing" id="2"><td class="title"><span class="titleline"><a href="https://example.com">Bar</a></span></td></tr>
        <tr><td class="subtext"><span class="score">3 points</span> by <a class="hnuser">bob</a> | <a href="item?id=2">discuss</a></td></tr>
        <tr class="athing" id="3"><td class="title"><span class="titleline"><a href="https://example.org">Baz</a></span></td></tr>
    </table></body></html>"#;

    struct FakeSource {
        page: Option<&'static str>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn serving(page: &'static str) -> Self {
            Self {
                page: Some(page),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                page: None,
                calls: Cell::new(0),
            }
        }
    }

    impl PageSource for FakeSource {
        async fn fetch_page(&self) -> Result<String, Box<dyn Error>> {
            self.calls.set(self.calls.get() + 1);
            self.page
                .map(str::to_string)
                .ok_or_else(|| "operation timed out".into())
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        refuse_connection: bool,
        refuse_send: bool,
        sent: RefCell<Vec<OutgoingMessage>>,
    }

    impl Mailer for FakeMailer {
        async fn verify(&self) -> Result<(), Box<dyn Error>> {
            if self.refuse_connection {
                return Err("535 authentication failed".into());
            }
            Ok(())
        }

        async fn send(&self, message: &OutgoingMessage) -> Result<String, Box<dyn Error>> {
            if self.refuse_send {
                return Err("554 transaction failed".into());
            }
            self.sent.borrow_mut().push(message.clone());
            Ok("250 OK".to_string())
        }
    }

    fn settings(limit: usize) -> Settings {
        Settings {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            from_email: "me@example.com".to_string(),
            email_password: "pw".to_string(),
            to_email: "reader@example.com".to_string(),
            stories_limit: limit,
        }
    }

    #[tokio::test]
    async fn test_run_sends_digest() {
        let service = DigestService::new(settings(10), FakeSource::serving(PAGE), FakeMailer::default());
        assert!(service.run().await);

        let sent = service.mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        assert_eq!(message.to, "reader@example.com");
        assert!(message.subject.starts_with("Tech News - "));
        assert!(message.text.contains("1. Foo\n   Link: https://news.ycombinator.com/item?id=1"));
        assert!(message.text.contains("Author: alice | Points: 10 | Comments: 10"));
        assert!(message.text.contains("2. Bar"));
        assert!(message.text.contains("Author: bob | Points: 3 | Comments: 0"));
        assert!(message.text.contains("3. Baz"));
        assert!(message.text.contains("Author: unknown | Points: 0 | Comments: 0"));
        assert!(message.html.contains(">Foo</a>"));
    }

    #[tokio::test]
    async fn test_run_respects_limit() {
        let service = DigestService::new(settings(2), FakeSource::serving(PAGE), FakeMailer::default());
        assert_eq!(service.try_run().await.unwrap(), 2);

        let sent = service.mailer.sent.borrow();
        assert!(sent[0].text.contains("2. Bar"));
        assert!(!sent[0].text.contains("Baz"));
    }

    #[tokio::test]
    async fn test_unreachable_mailer_stops_before_fetch() {
        let mailer = FakeMailer {
            refuse_connection: true,
            ..FakeMailer::default()
        };
        let service = DigestService::new(settings(10), FakeSource::serving(PAGE), mailer);

        assert!(matches!(service.try_run().await, Err(RunError::MailerUnavailable(_))));
        assert!(!service.run().await);
        assert_eq!(service.source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let service = DigestService::new(settings(10), FakeSource::failing(), FakeMailer::default());

        assert!(matches!(service.try_run().await, Err(RunError::Fetch(_))));
        assert!(service.mailer.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_is_distinct_from_fetch_failure() {
        let service = DigestService::new(
            settings(10),
            FakeSource::serving("<html><body>We're having some trouble serving your request.</body></html>"),
            FakeMailer::default(),
        );

        assert!(matches!(service.try_run().await, Err(RunError::NoStories)));
        assert!(!service.run().await);
        assert!(service.mailer.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_returns_false() {
        let mailer = FakeMailer {
            refuse_send: true,
            ..FakeMailer::default()
        };
        let service = DigestService::new(settings(10), FakeSource::serving(PAGE), mailer);

        assert!(matches!(service.try_run().await, Err(RunError::Send(_))));
        assert!(!service.run().await);
    }

    #[test]
    fn test_run_error_messages() {
        assert_eq!(RunError::NoStories.to_string(), "no stories found on the front page");
        let e = RunError::Fetch("timeout".into());
        assert_eq!(e.to_string(), "fetching the front page failed: timeout");
    }
}
