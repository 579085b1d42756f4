use crate::content::boilerplate::strip_boilerplate;
use crate::content::sanitizer::sanitize;
use crate::store::{Era, PostRecord};

const NO_CONTENT: &str = "No content available.";

/// Picks the best displayable body for a post, degrading through three
/// tiers: trusted pre-clean HTML, sanitized HTML, escaped-text paragraphs.
/// Total: every record shape produces markup, worst case the no-content
/// paragraph.
pub fn render_body(post: &PostRecord) -> String {
    let body_html = post.body_html.as_deref().unwrap_or("");

    // Pre-clean era markup was extracted from structured page data and is
    // already safe to embed as-is.
    let trusted = match post.era {
        Era::NextjsV2 => true,
        Era::SoxSpaceNews | Era::SoxSpaceBoston | Era::Other(_) => false,
    };
    if trusted && !body_html.is_empty() {
        return body_html.to_string();
    }

    if !body_html.is_empty() {
        let cleaned = sanitize(body_html);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    let body_text = post.body_text.as_deref().unwrap_or(NO_CONTENT);
    let body_text = strip_boilerplate(body_text);
    if body_text.is_empty() {
        return escape_paragraphs(NO_CONTENT);
    }
    escape_paragraphs(&body_text)
}

/// Splits plain text on blank lines (single newlines when that yields a
/// single block) and wraps each block in an escaped paragraph element.
fn escape_paragraphs(text: &str) -> String {
    let mut segments: Vec<&str> = text.split("\n\n").collect();
    if segments.len() <= 1 {
        segments = text.split('\n').collect();
    }

    let mut out = String::new();
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        out.push_str("<p>");
        out.push_str(&html_escape::encode_text(segment));
        out.push_str("</p>");
    }
    out
}
