use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use blogvault::store::archive::{
    POSTS_FTS_FILL_SQL, POSTS_FTS_SQL, POSTS_INDEX_SQL, POSTS_TABLE_SQL,
};
use blogvault::store::Era;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct DeployArgs {
    /// Scraper database to copy from
    #[arg(short, long)]
    source: String,

    /// Deployable database to create
    #[arg(short, long)]
    dest: String,

    /// Author whose posts are copied
    #[arg(short, long, default_value = "Jared Carrabis")]
    author: String,
}

#[derive(sqlx::FromRow)]
struct SourceRow {
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

fn size_mb(path: &Path) -> Result<f64> {
    let meta = fs::metadata(path)
        .with_context(|| format!("Error reading size of {}", path.display()))?;
    Ok(meta.len() as f64 / (1024.0 * 1024.0))
}

async fn open_source(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Error opening source database {}", path.display()))?;
    Ok(pool)
}

async fn create_dest(path: &Path) -> Result<SqlitePool> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Error removing stale {}", path.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Error creating deploy database {}", path.display()))?;
    Ok(pool)
}

pub async fn deploy_cmd(args: DeployArgs) -> Result<()> {
    let source_path = PathBuf::from(&args.source);
    let dest_path = PathBuf::from(&args.dest);

    println!("Source DB: {:.1} MB", size_mb(&source_path)?);

    let src = open_source(&source_path).await?;
    let dst = create_dest(&dest_path).await?;

    sqlx::query(POSTS_TABLE_SQL).execute(&dst).await?;

    let rows: Vec<SourceRow> = sqlx::query_as(
        "SELECT id, original_url, wayback_url, title, author, \
         date_published, body_text, body_html, confidence, \
         match_strategy, era, source \
         FROM posts WHERE author = ?",
    )
    .bind(&args.author)
    .fetch_all(&src)
    .await?;

    println!("Copying {} posts by {}...", rows.len(), args.author);

    let mut html_kept = 0;
    let mut text_only = 0;
    let mut source_counts: BTreeMap<String, i64> = BTreeMap::new();

    let mut tx = dst.begin().await?;
    for row in &rows {
        let era = row.era.clone().unwrap_or_default();
        let source = row
            .source
            .clone()
            .unwrap_or_else(|| "barstool".to_string());

        // body_html survives only for eras whose scraped markup is clean
        // enough to render; everything else falls back to body_text
        let body_html = if Era::parse(&era).keeps_stored_html() {
            html_kept += 1;
            row.body_html.as_deref()
        } else {
            text_only += 1;
            None
        };

        *source_counts.entry(source.clone()).or_insert(0) += 1;

        sqlx::query("INSERT INTO posts VALUES (?,?,?,?,?,?,?,?,?,?,?,?)")
            .bind(row.id)
            .bind(&row.original_url)
            .bind(&row.wayback_url)
            .bind(&row.title)
            .bind(&row.author)
            .bind(&row.date_published)
            .bind(&row.body_text)
            .bind(body_html)
            .bind(&row.confidence)
            .bind(&row.match_strategy)
            .bind(&era)
            .bind(&source)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    println!("  {} with body_html kept", html_kept);
    println!("  {} with body_text only", text_only);
    println!("  By source:");
    for (source, count) in &source_counts {
        println!("    {}: {}", source, count);
    }

    println!("Building search index...");
    sqlx::query(POSTS_FTS_SQL).execute(&dst).await?;
    sqlx::query(POSTS_FTS_FILL_SQL).execute(&dst).await?;

    for stmt in POSTS_INDEX_SQL {
        sqlx::query(stmt).execute(&dst).await?;
    }

    println!("Vacuuming...");
    sqlx::query("VACUUM").execute(&dst).await?;

    src.close().await;
    dst.close().await;

    println!();
    println!("Done!");
    println!("  Original:  {:.1} MB", size_mb(&source_path)?);
    println!("  Deploy:    {:.1} MB", size_mb(&dest_path)?);
    println!("  Posts:     {}", rows.len());

    Ok(())
}
