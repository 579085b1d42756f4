use lazy_static::lazy_static;
use regex::Regex;

// Markers that indicate the article is over and template junk begins.
// Scanned in priority order: the first pattern in this list that matches
// anywhere in the text wins, even if a later pattern occurs earlier in the
// text. The old corpus was tuned against this exact rule, so keep it.
const CUT_PATTERNS: [&str; 16] = [
    r"Follow\s+@\w+\s+Share\s+Tweet",
    r"Share\s+Tweet\s+React\s*\(\d+\)",
    r"Top \d+ Comments",
    r"\d+ comments?\s+Sort by",
    r"Comments will close out",
    r"Thumbs Up\s+Thumbs Down\s+by\s+",
    r"Up:\s*\d+\s*Down:\s*\d+",
    r"Leave a Comment",
    r"Tweets\s+.*?http://t\.co/",
    r"Tour Dates\s+",
    r"Featured Video\s+",
    r"View more Videos",
    r"Â©\s*\d{4}\s*Barstool", // scraped pages carry the mojibake copyright sign
    r"Disclaimer\s*\|\s*Copyright",
    r"Media Kit\s*$",
    r"Barstool Sports\s*\|\s*Disclaimer",
];

lazy_static! {
    static ref CUT_REGEXES: Vec<Regex> = CUT_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();
    static ref TRAILING_BYLINE: Regex =
        Regex::new(r"(?i)\s*By\s+\w+\s+posted\s+\w+\s+\d+.*$").unwrap();
    static ref LEADING_NAV: Regex = Regex::new(
        r"(?is)^Home\s+The Store\s+BarstoolTV\s+.*?Barstool Sports\s+All Categories\s+"
    )
    .unwrap();
}

/// Strips comment sections, sidebar tweet dumps, footer junk and bylines
/// from a plain-text post body. Old wordpress-era posts have all of this
/// baked into the text. Cleaned text normally passes through unchanged;
/// the exception is a lower-priority marker surviving the first cut, which
/// truncates again on a later pass.
pub fn strip_boilerplate(text: &str) -> String {
    let mut text = text;

    for pattern in CUT_REGEXES.iter() {
        if let Some(m) = pattern.find(text) {
            // Cut everything from this point
            text = text[..m.start()].trim_end();
            break;
        }
    }

    // "By carrabis posted November 24th, 2014 at 10:00 AM" bylines at the end
    if let Some(m) = TRAILING_BYLINE.find(text) {
        text = text[..m.start()].trim_end();
    }

    // "Home The Store BarstoolTV ..." nav text at the start
    if let Some(m) = LEADING_NAV.find(text) {
        text = text[m.end()..].trim_start();
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_at_share_counter() {
        let text = "Great game today.\n\nShare Tweet React (12)\nuser1: nice post";
        assert_eq!(strip_boilerplate(text), "Great game today.");
    }

    #[test]
    fn test_cut_at_comment_header() {
        let text = "Final recap.\n\nTop 10 Comments\nsomeone said something";
        assert_eq!(strip_boilerplate(text), "Final recap.");
    }

    #[test]
    fn test_priority_order_beats_position() {
        // "Leave a Comment" occurs earlier in the text, but "Top 5 Comments"
        // sits higher in the priority list, so the cut happens there.
        let text = "Intro. Leave a Comment mid-article joke.\n\nTop 5 Comments\njunk";
        assert_eq!(
            strip_boilerplate(text),
            "Intro. Leave a Comment mid-article joke."
        );
    }

    #[test]
    fn test_trailing_byline_removed() {
        let text = "Here are my final thoughts. By carrabis posted November 24th, 2014 at 10:00 AM";
        assert_eq!(strip_boilerplate(text), "Here are my final thoughts.");
    }

    #[test]
    fn test_byline_case_insensitive() {
        let text = "Done for today. by carrabis posted May 3rd, 2012 at 9:00 AM";
        assert_eq!(strip_boilerplate(text), "Done for today.");
    }

    #[test]
    fn test_leading_nav_removed() {
        let text = "Home The Store BarstoolTV Boston Barstool Sports All Categories \
                    The actual article starts here.";
        assert_eq!(strip_boilerplate(text), "The actual article starts here.");
    }

    #[test]
    fn test_copyright_footer_cut() {
        let text = "Season over.\n\nÂ© 2014 Barstool Sports all rights reserved";
        assert_eq!(strip_boilerplate(text), "Season over.");
    }

    #[test]
    fn test_no_marker_is_noop() {
        let text = "Just a clean post body with nothing to strip.";
        assert_eq!(strip_boilerplate(text), text);
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(strip_boilerplate(""), "");
        assert_eq!(strip_boilerplate("   \n  "), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Great game today.\n\nShare Tweet React (12)\nuser1: nice post",
            "Here are my final thoughts. By carrabis posted November 24th, 2014 at 10:00 AM",
            "Home The Store BarstoolTV Boston Barstool Sports All Categories Body.",
            "Plain text, nothing special.",
        ];
        for input in inputs {
            let once = strip_boilerplate(input);
            assert_eq!(strip_boilerplate(&once), once, "not idempotent for {:?}", input);
        }
    }
}
