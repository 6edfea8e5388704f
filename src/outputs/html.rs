//! HTML digest body.
//!
//! Produces a self-contained document with inline CSS, since most mail
//! clients drop external stylesheets. All story fields are escaped.

use super::SOURCE_URL;
use crate::models::StoryRecord;
use crate::utils::{date_label, timestamp_label};
use chrono::NaiveDateTime;
use html_escape::{encode_double_quoted_attribute, encode_text};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background-color: #f5f5f5; }
    .container { max-width: 600px; margin: 0 auto; background-color: white; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
    .header { background: linear-gradient(135deg, #ff6600, #ff8533); color: white; padding: 30px 20px; text-align: center; }
    .header h1 { margin: 0 0 10px 0; font-size: 28px; font-weight: 300; }
    .header p { margin: 0; opacity: 0.9; font-size: 16px; }
    .content { padding: 20px; }
    .story { border-bottom: 1px solid #eee; padding: 20px 0; margin: 0; }
    .story:last-child { border-bottom: none; }
    .story-number { display: inline-block; background-color: #ff6600; color: white; width: 24px; height: 24px; border-radius: 50%; text-align: center; line-height: 24px; font-size: 12px; font-weight: bold; margin-right: 12px; vertical-align: top; margin-top: 2px; }
    .story-title { font-size: 18px; font-weight: 600; margin-bottom: 8px; display: inline-block; width: calc(100% - 36px); vertical-align: top; }
    .story-title a { color: #333; text-decoration: none; line-height: 1.4; }
    .story-meta { color: #666; font-size: 14px; margin-left: 36px; display: flex; gap: 15px; flex-wrap: wrap; }
    .footer { text-align: center; padding: 30px 20px; background-color: #f8f9fa; color: #666; border-top: 1px solid #eee; }
    .footer p { margin: 5px 0; font-size: 14px; }
    @media (max-width: 600px) {
        .story-number { float: left; margin-top: 4px; }
        .story-title { width: calc(100% - 40px); margin-left: 4px; }
        .story-meta { margin-left: 0; margin-top: 8px; }
    }
"#;

/// Render the HTML body for `stories`.
pub fn render_html(stories: &[StoryRecord], generated_at: &NaiveDateTime) -> String {
    let mut out = String::with_capacity(4096 + stories.len() * 512);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("<style>{STYLE}</style>\n"));
    out.push_str("</head>\n<body>\n<div class=\"container\">\n");

    out.push_str(&format!(
        "<div class=\"header\">\n<h1>Top Tech News</h1>\n<p>Top technology stories - {}</p>\n</div>\n",
        date_label(generated_at)
    ));

    out.push_str("<div class=\"content\">\n");
    for (index, story) in stories.iter().enumerate() {
        out.push_str(&story_block(index + 1, story));
    }
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<div class=\"footer\">\n\
         <p><strong>Generated automatically by hn_digest</strong></p>\n\
         <p>Date: {}</p>\n\
         <p>Source: <a href=\"{SOURCE_URL}\" style=\"color: #ff6600;\">Hacker News</a></p>\n\
         </div>\n",
        timestamp_label(generated_at)
    ));

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn story_block(rank: usize, story: &StoryRecord) -> String {
    format!(
        "<div class=\"story\">\n\
         <span class=\"story-number\">{rank}</span>\n\
         <div class=\"story-title\"><a href=\"{link}\" target=\"_blank\">{title}</a></div>\n\
         <div class=\"story-meta\">\n\
         <span class=\"meta-item\">by {author}</span>\n\
         <span class=\"meta-item\">{points} points</span>\n\
         <span class=\"meta-item\">{comments} comments</span>\n\
         </div>\n\
         </div>\n",
        link = encode_double_quoted_attribute(story.link()),
        title = encode_text(story.title()),
        author = encode_text(story.author()),
        points = story.points(),
        comments = story.comments(),
    )
}
