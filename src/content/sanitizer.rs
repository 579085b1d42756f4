use ego_tree::NodeRef;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::node::{Element, Node};
use scraper::Html;

/// Tags that may survive sanitization. Everything else is unwrapped and
/// its children are kept in place.
const ALLOWED_TAGS: [&str; 31] = [
    "p", "br", "b", "i", "em", "strong", "a", "img", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
    "ol", "li", "blockquote", "pre", "code", "table", "thead", "tbody", "tr", "td", "th", "hr",
    "span", "div", "figure", "figcaption",
];

const ALLOWED_EMBED_TAGS: [&str; 3] = ["video", "source", "iframe"];

/// Tags whose whole subtree is template machinery, never article content.
const STRIP_TAGS: [&str; 9] = [
    "script", "style", "nav", "header", "footer", "noscript", "link", "meta", "head",
];

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "source"];

/// Anything shorter than this after sanitization is a hollowed-out shell
/// (a stray wrapper div, an empty paragraph) rather than a usable body.
const MIN_USABLE_LEN: usize = 50;

lazy_static! {
    static ref JUNK_NAME: Regex = Regex::new(concat!(
        "(?i)(sidebar|nav|menu|footer|header|comment|social|share|related|",
        "newsletter|popup|modal|overlay|ad-|advertisement|cookie|",
        "wm-ipp|wayback|toolbar|donate)"
    ))
    .unwrap();
}

fn allowed_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "target", "rel"],
        "img" => &["src", "alt", "width", "height"],
        "iframe" => &["src", "width", "height", "frameborder", "allowfullscreen"],
        "video" => &["src", "controls", "width", "height"],
        "source" => &["src", "type"],
        "td" | "th" => &["colspan", "rowspan"],
        _ => &[],
    }
}

fn is_allowed(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag) || ALLOWED_EMBED_TAGS.contains(&tag)
}

fn is_junk_element(el: &Element) -> bool {
    let classes = el.attr("class").unwrap_or("");
    let id = el.attr("id").unwrap_or("");
    JUNK_NAME.is_match(classes) || JUNK_NAME.is_match(id)
}

/// Strips raw markup down to just article content: removes scripts, nav,
/// sidebars and junk-named wrappers, unwraps everything outside the tag
/// allow-list and drops non-allow-listed attributes.
///
/// Parsing is best-effort recovery; nothing here returns an error. An empty
/// result means the markup held no usable article and the caller should
/// fall back to the plain-text body.
pub fn sanitize(raw_markup: &str) -> String {
    if raw_markup.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(raw_markup);
    let mut out = String::new();
    write_children(fragment.tree.root(), &mut out);

    let out = out.trim();
    if out.len() <= MIN_USABLE_LEN {
        String::new()
    } else {
        out.to_string()
    }
}

fn write_children(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        write_node(child, out);
    }
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            out.push_str(&html_escape::encode_text(&*text.text));
        }
        Node::Element(el) => {
            let name = el.name();
            if STRIP_TAGS.contains(&name) || is_junk_element(el) {
                return;
            }
            if !is_allowed(name) {
                // Unwrap: the element is discarded, its content stays put.
                // Recursing handles arbitrarily nested disallowed wrappers.
                write_children(node, out);
                return;
            }
            write_element(node, el, name, out);
        }
        Node::Document | Node::Fragment => write_children(node, out),
        // Comments, doctypes and processing instructions never make it out
        _ => {}
    }
}

fn write_element(node: NodeRef<'_, Node>, el: &Element, name: &str, out: &mut String) {
    let keep = allowed_attrs(name);

    out.push('<');
    out.push_str(name);
    for (attr, value) in el.attrs() {
        if keep.contains(&attr) {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return;
    }

    write_children(node, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
