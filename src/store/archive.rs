use std::path::Path;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::store::{
    ArchiveStats, Confidence, ConfidenceFilter, Era, PostRecord, PostSummary, SearchParams,
    SortOrder,
};

/// Deploy database schema. Shared with the tool binary that builds the
/// deployable copy and with the in-memory test databases.
pub const POSTS_TABLE_SQL: &str = r#"
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY,
        original_url TEXT,
        wayback_url TEXT,
        title TEXT,
        author TEXT,
        date_published TEXT,
        body_text TEXT,
        body_html TEXT,
        confidence TEXT,
        match_strategy TEXT,
        era TEXT,
        source TEXT
    )
"#;

pub const POSTS_FTS_SQL: &str = r#"
    CREATE VIRTUAL TABLE posts_fts USING fts5(
        title, body_text,
        content='posts',
        content_rowid='id'
    )
"#;

pub const POSTS_FTS_FILL_SQL: &str = r#"
    INSERT INTO posts_fts(rowid, title, body_text)
    SELECT id, title, body_text FROM posts
"#;

pub const POSTS_INDEX_SQL: [&str; 4] = [
    "CREATE INDEX idx_posts_author ON posts(author)",
    "CREATE INDEX idx_posts_confidence ON posts(confidence)",
    "CREATE INDEX idx_posts_title ON posts(title)",
    "CREATE INDEX idx_posts_source ON posts(source)",
];

const SUMMARY_COLUMNS: &str = "p.id, p.title, p.date_published, p.confidence, p.match_strategy, \
     p.wayback_url, p.original_url, substr(p.body_text, 1, 300) AS snippet";

/// Read-only access to the archive database. Only the archived author's
/// posts are ever surfaced by search; the author filter is fixed at open
/// time, not a query parameter.
pub struct Archive {
    pool: SqlitePool,
    author: String,
    min_date: String,
    max_date: String,
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: i64,
    title: Option<String>,
    date_published: Option<String>,
    confidence: Option<String>,
    match_strategy: Option<String>,
    wayback_url: Option<String>,
    original_url: Option<String>,
    snippet: Option<String>,
}

impl SummaryRow {
    fn into_summary(self) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title,
            date_published: self.date_published,
            confidence: Confidence::parse(self.confidence.as_deref()),
            match_strategy: self.match_strategy,
            wayback_url: self.wayback_url,
            original_url: self.original_url,
            snippet: self.snippet,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    original_url: Option<String>,
    wayback_url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    date_published: Option<String>,
    body_text: Option<String>,
    body_html: Option<String>,
    confidence: Option<String>,
    match_strategy: Option<String>,
    era: Option<String>,
    source: Option<String>,
}

impl PostRow {
    fn into_record(self) -> PostRecord {
        PostRecord {
            id: self.id,
            title: self.title,
            author: self.author.unwrap_or_default(),
            date_published: self.date_published,
            body_text: self.body_text,
            body_html: self.body_html,
            confidence: Confidence::parse(self.confidence.as_deref()),
            match_strategy: self.match_strategy,
            era: Era::parse(self.era.as_deref().unwrap_or("")),
            original_url: self.original_url,
            wayback_url: self.wayback_url,
            source: self.source,
        }
    }
}

/// Quotes each bare word so user input is safe FTS5 syntax. Queries that
/// already carry quotes are passed through for exact-phrase searches.
fn fts_escape(query: &str) -> String {
    if query.contains('"') {
        return query.to_string();
    }
    query
        .split_whitespace()
        .map(|word| format!("\"{}\"", word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fts_match_expr(params: &SearchParams) -> Option<String> {
    let mut parts = vec![];
    let title_query = params.title_query.trim();
    if !title_query.is_empty() {
        parts.push(format!("title:{}", fts_escape(title_query)));
    }
    let body_query = params.body_query.trim();
    if !body_query.is_empty() {
        parts.push(format!("body_text:{}", fts_escape(body_query)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" AND "))
    }
}

impl Archive {
    pub async fn open(db_path: &Path, author: &str, min_date: &str, max_date: &str) -> Result<Archive> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool, author, min_date, max_date))
    }

    pub fn from_pool(pool: SqlitePool, author: &str, min_date: &str, max_date: &str) -> Archive {
        Archive {
            pool,
            author: author.to_string(),
            min_date: min_date.to_string(),
            max_date: max_date.to_string(),
        }
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, original_url, wayback_url, title, author, date_published, \
             body_text, body_html, confidence, match_strategy, era, source \
             FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_record))
    }

    /// Runs a list query: optional FTS5 match over title/body, confidence
    /// set filter, sort and page window. Returns the total match count
    /// alongside one page of summaries.
    pub async fn search(&self, params: &SearchParams) -> Result<(i64, Vec<PostSummary>)> {
        let conf_values: Vec<&'static str> = match &params.confidence {
            ConfidenceFilter::All => vec![],
            ConfidenceFilter::Only(values) => values.iter().map(|c| c.as_str()).collect(),
        };
        let conf_clause = if conf_values.is_empty() {
            String::new()
        } else {
            format!(
                "AND p.confidence IN ({})",
                vec!["?"; conf_values.len()].join(",")
            )
        };

        let (total, rows) = match fts_match_expr(params) {
            Some(fts_match) => {
                let order = if params.sort == SortOrder::Relevance {
                    "fts.rank"
                } else {
                    params.sort.order_clause()
                };

                let count_sql = format!(
                    "SELECT COUNT(*) FROM posts p \
                     JOIN posts_fts fts ON p.id = fts.rowid \
                     WHERE p.author = ? {conf_clause} AND fts.posts_fts MATCH ?"
                );
                let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(&self.author);
                for value in &conf_values {
                    count_query = count_query.bind(*value);
                }
                let total = count_query.bind(&fts_match).fetch_one(&self.pool).await?;

                let rows_sql = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM posts p \
                     JOIN posts_fts fts ON p.id = fts.rowid \
                     WHERE p.author = ? {conf_clause} AND fts.posts_fts MATCH ? \
                     ORDER BY {order} LIMIT ? OFFSET ?"
                );
                let mut rows_query = sqlx::query_as::<_, SummaryRow>(&rows_sql).bind(&self.author);
                for value in &conf_values {
                    rows_query = rows_query.bind(*value);
                }
                let rows = rows_query
                    .bind(&fts_match)
                    .bind(params.limit)
                    .bind(params.offset)
                    .fetch_all(&self.pool)
                    .await?;

                (total, rows)
            }
            None => {
                let order = params.sort.order_clause();

                let count_sql = format!(
                    "SELECT COUNT(*) FROM posts p WHERE p.author = ? {conf_clause}"
                );
                let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(&self.author);
                for value in &conf_values {
                    count_query = count_query.bind(*value);
                }
                let total = count_query.fetch_one(&self.pool).await?;

                let rows_sql = format!(
                    "SELECT {SUMMARY_COLUMNS} FROM posts p \
                     WHERE p.author = ? {conf_clause} \
                     ORDER BY {order} LIMIT ? OFFSET ?"
                );
                let mut rows_query = sqlx::query_as::<_, SummaryRow>(&rows_sql).bind(&self.author);
                for value in &conf_values {
                    rows_query = rows_query.bind(*value);
                }
                let rows = rows_query
                    .bind(params.limit)
                    .bind(params.offset)
                    .fetch_all(&self.pool)
                    .await?;

                (total, rows)
            }
        };

        Ok((total, rows.into_iter().map(SummaryRow::into_summary).collect()))
    }

    pub async fn stats(&self) -> Result<ArchiveStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        let author_posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author = ?")
            .bind(&self.author)
            .fetch_one(&self.pool)
            .await?;

        // Scraped dates are messy; aggregate over the sane window only
        let (min_date, max_date): (Option<String>, Option<String>) = sqlx::query_as(
            "SELECT MIN(date_published), MAX(date_published) FROM posts \
             WHERE author = ? AND date_published IS NOT NULL \
             AND date_published >= ? AND date_published <= ?",
        )
        .bind(&self.author)
        .bind(&self.min_date)
        .bind(&self.max_date)
        .fetch_one(&self.pool)
        .await?;

        let dated: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts \
             WHERE author = ? AND date_published IS NOT NULL \
             AND date_published >= ? AND date_published <= ?",
        )
        .bind(&self.author)
        .bind(&self.min_date)
        .bind(&self.max_date)
        .fetch_one(&self.pool)
        .await?;

        let by_confidence: Vec<(Option<String>, i64)> = sqlx::query_as(
            "SELECT confidence, COUNT(*) FROM posts WHERE author = ? GROUP BY confidence",
        )
        .bind(&self.author)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = ArchiveStats {
            total,
            author_posts,
            dated,
            undated: author_posts - dated,
            min_date,
            max_date,
            ..Default::default()
        };
        for (value, count) in by_confidence {
            match Confidence::parse(value.as_deref()) {
                Confidence::High => stats.high += count,
                Confidence::Medium => stats.medium += count,
                Confidence::Low => stats.low += count,
                Confidence::None => stats.none += count,
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHOR: &str = "Jared Carrabis";

    async fn test_archive() -> Archive {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(POSTS_TABLE_SQL).execute(&pool).await.unwrap();
        sqlx::query(POSTS_FTS_SQL).execute(&pool).await.unwrap();

        let posts = [
            (1, AUTHOR, "Sox Win The Opener", "2014-04-01", "high", "Great game today at Fenway."),
            (2, AUTHOR, "Mookie Traded", "2020-02-10", "medium", "Tough day for the fan base."),
            (3, AUTHOR, "Spring Training Notes", "2013-03-05", "low", "Spring training is underway."),
            (4, "Someone Else", "Other Author Post", "2015-06-01", "high", "Should never be listed."),
            (5, AUTHOR, "Undated Ramblings", "1970-01-01", "none", "Date outside the sane window."),
        ];
        for (id, author, title, date, confidence, body) in posts {
            sqlx::query(
                "INSERT INTO posts (id, title, author, date_published, confidence, body_text, era) \
                 VALUES (?, ?, ?, ?, ?, ?, 'wordpress_2011')",
            )
            .bind(id)
            .bind(title)
            .bind(author)
            .bind(date)
            .bind(confidence)
            .bind(body)
            .execute(&pool)
            .await
            .unwrap();
        }
        sqlx::query(POSTS_FTS_FILL_SQL).execute(&pool).await.unwrap();

        Archive::from_pool(pool, AUTHOR, "2010-01-01", "2025-12-31")
    }

    fn params() -> SearchParams {
        SearchParams {
            title_query: String::new(),
            body_query: String::new(),
            confidence: ConfidenceFilter::All,
            sort: SortOrder::Newest,
            limit: 50,
            offset: 0,
        }
    }

    #[tokio::test]
    async fn test_list_excludes_other_authors() {
        let archive = test_archive().await;
        let (total, rows) = archive.search(&params()).await.unwrap();
        assert_eq!(total, 4);
        assert!(rows.iter().all(|r| r.title.as_deref() != Some("Other Author Post")));
    }

    #[tokio::test]
    async fn test_newest_first_ordering() {
        let archive = test_archive().await;
        let (_, rows) = archive.search(&params()).await.unwrap();
        assert_eq!(rows[0].title.as_deref(), Some("Mookie Traded"));
    }

    #[tokio::test]
    async fn test_title_search() {
        let archive = test_archive().await;
        let mut p = params();
        p.title_query = "mookie".to_string();
        let (total, rows) = archive.search(&p).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].title.as_deref(), Some("Mookie Traded"));
    }

    #[tokio::test]
    async fn test_body_search() {
        let archive = test_archive().await;
        let mut p = params();
        p.body_query = "fenway".to_string();
        let (total, rows) = archive.search(&p).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].snippet.as_deref(), Some("Great game today at Fenway."));
    }

    #[tokio::test]
    async fn test_combined_title_and_body_search() {
        let archive = test_archive().await;
        let mut p = params();
        p.title_query = "sox".to_string();
        p.body_query = "fenway".to_string();
        let (total, rows) = archive.search(&p).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, 1);
    }

    #[tokio::test]
    async fn test_confidence_filter() {
        let archive = test_archive().await;
        let mut p = params();
        p.confidence = ConfidenceFilter::parse("high,medium");
        let (total, _) = archive.search(&p).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_relevance_sort_with_query() {
        let archive = test_archive().await;
        let mut p = params();
        p.body_query = "spring training".to_string();
        p.sort = SortOrder::Relevance;
        let (total, rows) = archive.search(&p).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, 3);
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let archive = test_archive().await;
        let mut p = params();
        p.limit = 2;
        p.offset = 2;
        let (total, rows) = archive.search(&p).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_get_post() {
        let archive = test_archive().await;
        let post = archive.get_post(1).await.unwrap().unwrap();
        assert_eq!(post.title.as_deref(), Some("Sox Win The Opener"));
        assert_eq!(post.confidence, Confidence::High);
        assert_eq!(post.era, Era::Other("wordpress_2011".to_string()));

        assert!(archive.get_post(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats() {
        let archive = test_archive().await;
        let stats = archive.stats().await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.author_posts, 4);
        assert_eq!(stats.dated, 3);
        assert_eq!(stats.undated, 1);
        assert_eq!(stats.min_date.as_deref(), Some("2013-03-05"));
        assert_eq!(stats.max_date.as_deref(), Some("2020-02-10"));
        assert_eq!(stats.high, 1);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.none, 1);
    }

    #[test]
    fn test_fts_escape_quotes_words() {
        assert_eq!(fts_escape("red sox"), "\"red\" \"sox\"");
        assert_eq!(fts_escape("\"exact phrase\""), "\"exact phrase\"");
    }
}
