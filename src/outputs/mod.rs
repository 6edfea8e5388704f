//! Digest rendering for the outgoing message.
//!
//! The extracted stories are rendered twice, into the two parts of a
//! `multipart/alternative` message:
//!
//! # Submodules
//!
//! - [`html`]: Styled HTML document shown by most mail clients
//! - [`text`]: Plain-text fallback
//!
//! Both renderers number stories from 1 in sequence order; the rank is not
//! stored on the records themselves.

pub mod html;
pub mod text;

use crate::utils::date_label;
use chrono::NaiveDateTime;

/// Source page linked from the digest footer.
pub const SOURCE_URL: &str = crate::scrapers::hackernews::BASE_URL;

/// Subject line for a digest generated at `at`.
pub fn subject_line(at: &NaiveDateTime) -> String {
    format!("Tech News - {}", date_label(at))
}
