pub mod archive;

pub use archive::Archive;

/// Which historical site template / scraping pass produced a record. The
/// era decides how much the stored markup can be trusted: `nextjs_v2` body
/// HTML came out of structured page data and is already clean, the two
/// soxspace eras kept decent HTML that still needs sanitizing, everything
/// else is text-only territory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Era {
    NextjsV2,
    SoxSpaceNews,
    SoxSpaceBoston,
    Other(String),
}

impl Era {
    pub fn parse(tag: &str) -> Era {
        match tag {
            "nextjs_v2" => Era::NextjsV2,
            "soxspacenews" => Era::SoxSpaceNews,
            "soxspaceboston" => Era::SoxSpaceBoston,
            other => Era::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Era::NextjsV2 => "nextjs_v2",
            Era::SoxSpaceNews => "soxspacenews",
            Era::SoxSpaceBoston => "soxspaceboston",
            Era::Other(tag) => tag.as_str(),
        }
    }

    /// Eras whose stored `body_html` is worth shipping in the deploy
    /// database. For the rest the browser falls back to `body_text`.
    pub fn keeps_stored_html(&self) -> bool {
        match self {
            Era::NextjsV2 | Era::SoxSpaceNews | Era::SoxSpaceBoston => true,
            Era::Other(_) => false,
        }
    }
}

/// How certain the ingestion pass was that a post really belongs to the
/// archived author. Computed upstream, only displayed and filtered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

impl Confidence {
    pub fn parse(value: Option<&str>) -> Confidence {
        match value {
            Some("high") => Confidence::High,
            Some("medium") => Confidence::Medium,
            Some("low") => Confidence::Low,
            _ => Confidence::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
            Confidence::None => "None",
        }
    }

    pub fn dot_color(&self) -> &'static str {
        match self {
            Confidence::High => "#2a9d2a",
            Confidence::Medium => "#cc9900",
            Confidence::Low => "#cc3333",
            Confidence::None => "#888888",
        }
    }
}

/// Confidence filter as it arrives from the query string: "all" or a
/// comma-separated set such as "high,medium".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfidenceFilter {
    All,
    Only(Vec<Confidence>),
}

impl ConfidenceFilter {
    pub fn parse(value: &str) -> ConfidenceFilter {
        if value.trim().is_empty() || value == "all" {
            return ConfidenceFilter::All;
        }
        let values: Vec<Confidence> = value
            .split(',')
            .map(|c| Confidence::parse(Some(c.trim())))
            .collect();
        ConfidenceFilter::Only(values)
    }

    pub fn as_query_value(&self) -> String {
        match self {
            ConfidenceFilter::All => "all".to_string(),
            ConfidenceFilter::Only(values) => values
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
    TitleAz,
    TitleZa,
    Relevance,
}

impl SortOrder {
    pub fn parse(value: &str) -> SortOrder {
        match value {
            "oldest" => SortOrder::Oldest,
            "title_az" => SortOrder::TitleAz,
            "title_za" => SortOrder::TitleZa,
            "relevance" => SortOrder::Relevance,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAz => "title_az",
            SortOrder::TitleZa => "title_za",
            SortOrder::Relevance => "relevance",
        }
    }

    /// ORDER BY clause for the non-relevance sorts. Relevance ordering
    /// lives in the FTS join and has no meaning without a query.
    pub(crate) fn order_clause(&self) -> &'static str {
        match self {
            SortOrder::Oldest => "p.date_published ASC",
            SortOrder::TitleAz => "p.title ASC",
            SortOrder::TitleZa => "p.title DESC",
            SortOrder::Newest | SortOrder::Relevance => "p.date_published DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub title_query: String,
    pub body_query: String,
    pub confidence: ConfidenceFilter,
    pub sort: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl SearchParams {
    pub fn has_query(&self) -> bool {
        !self.title_query.trim().is_empty() || !self.body_query.trim().is_empty()
    }
}

/// A full record as stored by the scraper. Immutable; the browser never
/// writes back.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: i64,
    pub title: Option<String>,
    pub author: String,
    pub date_published: Option<String>,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub confidence: Confidence,
    pub match_strategy: Option<String>,
    pub era: Era,
    pub original_url: Option<String>,
    pub wayback_url: Option<String>,
    pub source: Option<String>,
}

/// The lightweight shape the list view works with.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub id: i64,
    pub title: Option<String>,
    pub date_published: Option<String>,
    pub confidence: Confidence,
    pub match_strategy: Option<String>,
    pub wayback_url: Option<String>,
    pub original_url: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveStats {
    pub total: i64,
    pub author_posts: i64,
    pub dated: i64,
    pub undated: i64,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub none: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era_round_trip() {
        for tag in ["nextjs_v2", "soxspacenews", "soxspaceboston", "wordpress_2011"] {
            assert_eq!(Era::parse(tag).as_str(), tag);
        }
    }

    #[test]
    fn test_era_html_retention() {
        assert!(Era::parse("nextjs_v2").keeps_stored_html());
        assert!(Era::parse("soxspacenews").keeps_stored_html());
        assert!(!Era::parse("wordpress_2011").keeps_stored_html());
    }

    #[test]
    fn test_confidence_parse_defaults_to_none() {
        assert_eq!(Confidence::parse(Some("high")), Confidence::High);
        assert_eq!(Confidence::parse(Some("bogus")), Confidence::None);
        assert_eq!(Confidence::parse(None), Confidence::None);
    }

    #[test]
    fn test_confidence_filter_parse() {
        assert_eq!(ConfidenceFilter::parse("all"), ConfidenceFilter::All);
        assert_eq!(ConfidenceFilter::parse(""), ConfidenceFilter::All);
        assert_eq!(
            ConfidenceFilter::parse("high,medium"),
            ConfidenceFilter::Only(vec![Confidence::High, Confidence::Medium])
        );
        assert_eq!(
            ConfidenceFilter::parse("high,medium").as_query_value(),
            "high,medium"
        );
    }

    #[test]
    fn test_sort_order_parse_defaults_to_newest() {
        assert_eq!(SortOrder::parse("oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::parse("garbage"), SortOrder::Newest);
        assert_eq!(SortOrder::parse("relevance"), SortOrder::Relevance);
    }
}
