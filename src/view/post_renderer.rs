use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::store::PostRecord;
use crate::text_utils::DateWindow;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    id: i64,
    post_title: &'a str,
    author: &'a str,
    date: String,
    conf_label: &'static str,
    conf_color: &'static str,
    era: &'a str,
    wayback_url: &'a str,
    has_wayback: bool,
    original_url: &'a str,
    has_original: bool,
    post_body: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing post view template: {}", e),
                ));
            }
        };

        Ok(PostRenderer { template })
    }

    /// Renders the detail page. `body` is the output of the content
    /// selector and goes in unescaped; everything else is template-escaped.
    pub fn render(&self, post: &PostRecord, body: &str, window: &DateWindow) -> String {
        let wayback_url = post.wayback_url.as_deref().unwrap_or("");
        let original_url = post.original_url.as_deref().unwrap_or("");

        self.template.render(&ViewItem {
            id: post.id,
            post_title: post.title.as_deref().unwrap_or("Untitled"),
            author: post.author.as_str(),
            date: window.format_date(post.date_published.as_deref()),
            conf_label: post.confidence.label(),
            conf_color: post.confidence.dot_color(),
            era: post.era.as_str(),
            wayback_url,
            has_wayback: !wayback_url.is_empty(),
            original_url,
            has_original: !original_url.is_empty(),
            post_body: body,
        })
    }
}
