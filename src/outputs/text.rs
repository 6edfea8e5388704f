//! Plain-text digest body.
//!
//! ```text
//! Top Tech News - 06/05/2025
//! ==================================================
//!
//! 1. Story title
//!    Link: https://…
//!    Author: alice | Points: 10 | Comments: 4
//! ```

use super::SOURCE_URL;
use crate::models::StoryRecord;
use crate::utils::{date_label, timestamp_label};
use chrono::NaiveDateTime;

const RULE_WIDTH: usize = 50;

/// Render the plain-text body for `stories`.
pub fn render_text(stories: &[StoryRecord], generated_at: &NaiveDateTime) -> String {
    let mut out = format!("Top Tech News - {}\n", date_label(generated_at));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for (index, story) in stories.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, story.title()));
        out.push_str(&format!("   Link: {}\n", story.link()));
        out.push_str(&format!(
            "   Author: {} | Points: {} | Comments: {}\n\n",
            story.author(),
            story.points(),
            story.comments()
        ));
    }

    out.push_str(&format!(
        "\nGenerated automatically on {}\n",
        timestamp_label(generated_at)
    ));
    out.push_str(&format!("Source: {SOURCE_URL}"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoryMeta;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_render_text_enumerates_stories() {
        let stories = vec![
            StoryRecord::new(
                "Foo",
                "https://news.ycombinator.com/item?id=1",
                StoryMeta {
                    points: 10,
                    author: "alice".to_string(),
                    comments: 4,
                },
            ),
            StoryRecord::new("Bar", "https://example.com", StoryMeta::default()),
        ];

        let text = render_text(&stories, &at());
        assert!(text.starts_with("Top Tech News - 06/05/2025\n"));
        assert!(text.contains(&"=".repeat(50)));
        assert!(text.contains("1. Foo\n   Link: https://news.ycombinator.com/item?id=1\n"));
        assert!(text.contains("   Author: alice | Points: 10 | Comments: 4\n"));
        assert!(text.contains("2. Bar\n"));
        assert!(text.contains("   Author: unknown | Points: 0 | Comments: 0\n"));
        assert!(text.contains("Generated automatically on 06/05/2025 09:15:00"));
        assert!(text.ends_with("Source: https://news.ycombinator.com"));
    }

    #[test]
    fn test_render_text_keeps_sequence_order() {
        let stories: Vec<StoryRecord> = ["a", "b", "c"]
            .iter()
            .map(|t| StoryRecord::new(t, "", StoryMeta::default()))
            .collect();
        let text = render_text(&stories, &at());
        let a = text.find("1. a").unwrap();
        let b = text.find("2. b").unwrap();
        let c = text.find("3. c").unwrap();
        assert!(a < b && b < c);
    }
}
