//! Listing page scrapers.
//!
//! Scraping happens in two steps:
//!
//! 1. **Fetching**: download the listing page through a [`hackernews::PageSource`]
//! 2. **Extracting**: parse the markup into an ordered `Vec<StoryRecord>`
//!    with [`hackernews::extract_stories`]
//!
//! Extraction is synchronous and pure. A story row that cannot be read is
//! logged and skipped without failing the rest of the page.

pub mod hackernews;
