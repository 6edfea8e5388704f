//! Hacker News front page scraper.
//!
//! This module fetches the [Hacker News](https://news.ycombinator.com) front
//! page and turns its markup into [`StoryRecord`]s.
//!
//! # Page Structure
//!
//! Each story is spread over two adjacent table rows that share no
//! identifier:
//!
//! ```text
//! <tr class="athing" id="…">   title row:    .titleline > a
//! <tr>                         metadata row: .score, .hnuser, "N comments"
//! ```
//!
//! The metadata row is found purely by sibling adjacency. Every metadata
//! field has a default, so a change in the upstream markup degrades the
//! extracted values instead of dropping the story.

use crate::models::{StoryMeta, StoryRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::error::SelectorErrorKind;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Page that is fetched, and origin used to resolve relative discussion links.
pub const BASE_URL: &str = "https://news.ycombinator.com";

/// Client identity sent with the page request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Relative links starting with this prefix point at a discussion page.
const DISCUSSION_PREFIX: &str = "item?";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Source of the raw listing page markup.
pub trait PageSource {
    /// Fetch the listing page and return its HTML.
    async fn fetch_page(&self) -> Result<String, Box<dyn Error>>;
}

/// [`PageSource`] backed by an HTTP GET against the live site.
#[derive(Debug)]
pub struct HttpPageSource {
    client: Client,
    url: String,
}

impl HttpPageSource {
    /// Build a source for the Hacker News front page.
    ///
    /// The client sends [`USER_AGENT`] and gives up after ten seconds.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: BASE_URL.to_string(),
        })
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch_page(&self) -> Result<String, Box<dyn Error>> {
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        info!(bytes = html.len(), "Fetched front page");
        Ok(html)
    }
}

/// CSS selectors for the parts of the page the extractor reads.
struct Selectors {
    story_row: Selector,
    title_line: Selector,
    anchor: Selector,
    score: Selector,
    user: Selector,
}

impl Selectors {
    fn new() -> Result<Self, SelectorErrorKind<'static>> {
        Ok(Self {
            story_row: Selector::parse(".athing")?,
            title_line: Selector::parse(".titleline")?,
            anchor: Selector::parse("a")?,
            score: Selector::parse(".score")?,
            user: Selector::parse(".hnuser")?,
        })
    }
}

/// Extract up to `limit` stories from a front page document.
///
/// Only the first `limit` story rows are looked at. Rows without a title
/// anchor are skipped and the remaining rows are still processed, so the
/// result keeps document order and holds at most `limit` records.
///
/// Never fails: if the document cannot be processed at all the result is
/// empty, which the caller reports as "no stories found".
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub fn extract_stories(html: &str, limit: usize) -> Vec<StoryRecord> {
    let selectors = match Selectors::new() {
        Ok(selectors) => selectors,
        Err(e) => {
            error!(error = %e, "Failed to build story selectors");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let stories: Vec<StoryRecord> = document
        .select(&selectors.story_row)
        .take(limit)
        .filter_map(|row| extract_story(row, &selectors))
        .collect();

    info!(count = stories.len(), "Extracted stories");
    stories
}

/// Turn one story row into a record, or `None` if it has no title anchor.
fn extract_story(row: ElementRef<'_>, selectors: &Selectors) -> Option<StoryRecord> {
    let id = row.value().attr("id").unwrap_or("?");

    let Some(anchor) = row
        .select(&selectors.title_line)
        .flat_map(|cell| cell.select(&selectors.anchor))
        .next()
    else {
        debug!(id, "Story row has no title anchor; skipping");
        return None;
    };

    let title = anchor.text().collect::<String>();
    let link = anchor
        .value()
        .attr("href")
        .map(resolve_link)
        .unwrap_or_default();

    let meta = match metadata_row(row, selectors) {
        Some(meta_row) => parse_meta(meta_row, selectors),
        None => {
            debug!(id, "Story row has no metadata row; using defaults");
            StoryMeta::default()
        }
    };

    Some(StoryRecord::new(&title, link, meta))
}

/// Locate the metadata row that belongs to a story row.
///
/// This is the next element sibling, provided it is a `tr` and not the
/// title row of another story.
fn metadata_row<'a>(row: ElementRef<'a>, selectors: &Selectors) -> Option<ElementRef<'a>> {
    let next = row.next_siblings().find_map(ElementRef::wrap)?;
    if next.value().name() != "tr" || selectors.story_row.matches(&next) {
        return None;
    }
    Some(next)
}

/// Read points, author and comment count from a metadata row.
///
/// Each field is looked up on its own and falls back to its default.
fn parse_meta(meta_row: ElementRef<'_>, selectors: &Selectors) -> StoryMeta {
    let defaults = StoryMeta::default();

    let points = meta_row
        .select(&selectors.score)
        .next()
        .and_then(|score| first_number(&score.text().collect::<String>()))
        .unwrap_or(defaults.points);

    let author = meta_row
        .select(&selectors.user)
        .next()
        .map(|user| user.text().collect::<String>().trim().to_string())
        .unwrap_or(defaults.author);

    // First anchor mentioning comments wins, even if it carries no number.
    let comments = meta_row
        .select(&selectors.anchor)
        .map(|a| a.text().collect::<String>())
        .find(|text| text.contains("comment"))
        .and_then(|text| first_number(&text))
        .unwrap_or(defaults.comments);

    StoryMeta {
        points,
        author,
        comments,
    }
}

/// Resolve a title link: discussion pages become absolute, the rest is kept.
fn resolve_link(href: &str) -> String {
    if href.starts_with(DISCUSSION_PREFIX) {
        format!("{BASE_URL}/{href}")
    } else {
        href.to_string()
    }
}

/// Parse the first run of ASCII digits in `text`.
fn first_number(text: &str) -> Option<u32> {
    DIGITS.find(text)?.as_str().parse().ok()
}
