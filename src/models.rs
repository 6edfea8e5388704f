//! Data models for scraped stories.
//!
//! This module defines the records the extractor produces:
//! - [`StoryRecord`]: One front-page story, fully populated
//! - [`StoryMeta`]: The score/author/comment fields read from a story's
//!   metadata row, with the default policy for each of them
//!
//! Records carry no rank. Consumers derive the rank from the position of a
//! record in the sequence the extractor returns.

use serde::{Deserialize, Serialize};

/// Author value used when a metadata row has no user attribution.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// The metadata fields of a story.
///
/// Every field has a total default, so a story whose metadata row is missing
/// or malformed is still fully populated. [`StoryMeta::default`] is the only
/// place these defaults are defined.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoryMeta {
    /// Score shown next to the story.
    pub points: u32,
    /// Username of the submitter.
    pub author: String,
    /// Number of discussion replies.
    pub comments: u32,
}

impl Default for StoryMeta {
    fn default() -> Self {
        Self {
            points: 0,
            author: UNKNOWN_AUTHOR.to_string(),
            comments: 0,
        }
    }
}

/// A single story extracted from the listing page.
///
/// Fields are private and only readable through accessors: a record is
/// immutable once [`StoryRecord::new`] has built it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoryRecord {
    title: String,
    link: String,
    points: u32,
    author: String,
    comments: u32,
}

impl StoryRecord {
    /// Build a record from a title, an already-resolved link and its metadata.
    ///
    /// The title is trimmed of surrounding whitespace.
    pub fn new(title: &str, link: impl Into<String>, meta: StoryMeta) -> Self {
        Self {
            title: title.trim().to_string(),
            link: link.into(),
            points: meta.points,
            author: meta.author,
            comments: meta.comments,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn comments(&self) -> u32 {
        self.comments
    }
}
