use chrono::NaiveDate;

/// The calendar window scraped dates are trusted inside. Anything outside
/// (epoch defaults, wayback capture timestamps leaking into fields) is
/// displayed as undated.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl DateWindow {
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> Self {
        DateWindow { min_date, max_date }
    }

    /// Stored dates are ISO strings, sometimes with a time part appended.
    pub fn parse_date(&self, date: Option<&str>) -> Option<NaiveDate> {
        let date = date?;
        let day_part = date.get(..10).unwrap_or(date);
        let parsed = NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()?;
        if parsed < self.min_date || parsed > self.max_date {
            return None;
        }
        Some(parsed)
    }

    pub fn format_date(&self, date: Option<&str>) -> String {
        match self.parse_date(date) {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => "No date".to_string(),
        }
    }
}

/// Trims a snippet to at most `max_chars` characters on a char boundary.
pub fn clip_snippet(text: &str, max_chars: usize) -> String {
    let mut clipped: String = text.chars().take(max_chars).collect();
    if clipped.len() < text.len() {
        clipped.push_str("...");
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_format_date_in_window() {
        assert_eq!(window().format_date(Some("2014-11-24")), "2014-11-24");
        assert_eq!(
            window().format_date(Some("2014-11-24T10:00:00")),
            "2014-11-24"
        );
    }

    #[test]
    fn test_format_date_outside_window() {
        assert_eq!(window().format_date(Some("1970-01-01")), "No date");
        assert_eq!(window().format_date(Some("2031-05-01")), "No date");
        assert_eq!(window().format_date(Some("not-a-date")), "No date");
        assert_eq!(window().format_date(None), "No date");
    }

    #[test]
    fn test_clip_snippet() {
        assert_eq!(clip_snippet("short", 200), "short");
        let long = "a".repeat(250);
        let clipped = clip_snippet(&long, 200);
        assert_eq!(clipped.len(), 203);
        assert!(clipped.ends_with("..."));
    }
}
