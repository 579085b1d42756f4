use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::store::{ArchiveStats, PostSummary, SearchParams, SortOrder};
use crate::text_utils::{clip_snippet, DateWindow};

const SNIPPET_CHARS: usize = 200;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    author: &'a str,
    total: i64,
    cur_page: u32,
    page_count: u32,
    has_search: bool,
    title_query: &'a str,
    body_query: &'a str,
    confidence_value: String,
    page_size: u32,
    stats: StatsView,
    post_list: Vec<PostItem>,
    has_results: bool,
    sort_options: Vec<SelectOption>,
    confidence_options: Vec<SelectOption>,
    page_size_options: Vec<SelectOption>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
}

#[derive(ramhorns::Content)]
struct StatsView {
    author_posts: i64,
    high: i64,
    medium: i64,
    dated: i64,
    undated: i64,
    min_date: String,
    max_date: String,
}

#[derive(ramhorns::Content)]
struct PostItem {
    link: String,
    title: String,
    date: String,
    conf_label: &'static str,
    conf_color: &'static str,
    snippet: String,
    has_snippet: bool,
}

#[derive(ramhorns::Content)]
struct SelectOption {
    value: String,
    label: &'static str,
    selected: bool,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("Error parsing list template: {}", e),
                ));
            }
        };

        Ok(ListRenderer { template })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &self,
        author: &str,
        posts: &[PostSummary],
        stats: &ArchiveStats,
        params: &SearchParams,
        total: i64,
        cur_page: u32,
        page_count: u32,
        page_size: u32,
        window: &DateWindow,
    ) -> String {
        let mut post_list = vec![];
        for post in posts {
            let snippet = post
                .snippet
                .as_deref()
                .map(|s| clip_snippet(s.trim(), SNIPPET_CHARS))
                .unwrap_or_default();
            post_list.push(PostItem {
                link: format!("/view/{}/", post.id),
                title: post
                    .title
                    .clone()
                    .unwrap_or_else(|| "Untitled".to_string()),
                date: window.format_date(post.date_published.as_deref()),
                conf_label: post.confidence.label(),
                conf_color: post.confidence.dot_color(),
                has_snippet: !snippet.is_empty(),
                snippet,
            });
        }

        let mut page_list: Vec<ViewPagination> = Vec::with_capacity(page_count as usize);
        for i in 1..=page_count {
            page_list.push(ViewPagination {
                current: i == cur_page,
                number: i,
            });
        }

        let confidence_value = params.confidence.as_query_value();
        let has_results = !post_list.is_empty();
        self.template.render(&ListPage {
            author,
            total,
            cur_page,
            page_count,
            has_search: params.has_query(),
            title_query: &params.title_query,
            body_query: &params.body_query,
            confidence_value: confidence_value.clone(),
            page_size,
            stats: StatsView {
                author_posts: stats.author_posts,
                high: stats.high,
                medium: stats.medium,
                dated: stats.dated,
                undated: stats.undated,
                min_date: stats.min_date.clone().unwrap_or_else(|| "?".to_string()),
                max_date: stats.max_date.clone().unwrap_or_else(|| "?".to_string()),
            },
            post_list,
            has_results,
            sort_options: sort_options(params),
            confidence_options: confidence_options(&confidence_value),
            page_size_options: page_size_options(page_size),
            page_list,
            show_pagination: page_count > 1,
        })
    }
}

fn sort_options(params: &SearchParams) -> Vec<SelectOption> {
    let mut pairs = vec![
        ("newest", "Newest first"),
        ("oldest", "Oldest first"),
        ("title_az", "Title A-Z"),
        ("title_za", "Title Z-A"),
    ];
    // Relevance only makes sense while searching
    if params.has_query() {
        pairs.insert(0, ("relevance", "Most relevant"));
    }

    pairs
        .into_iter()
        .map(|(value, label)| SelectOption {
            value: value.to_string(),
            label,
            selected: params.sort == SortOrder::parse(value),
        })
        .collect()
}

fn confidence_options(current: &str) -> Vec<SelectOption> {
    [
        ("all", "All"),
        ("high", "High only"),
        ("high,medium", "High + Medium"),
        ("medium", "Medium only"),
        ("low", "Low only"),
        ("none", "None only"),
    ]
    .into_iter()
    .map(|(value, label)| SelectOption {
        value: value.to_string(),
        label,
        selected: value == current,
    })
    .collect()
}

fn page_size_options(page_size: u32) -> Vec<SelectOption> {
    [
        (25u32, "25 per page"),
        (50, "50 per page"),
        (100, "100 per page"),
    ]
    .into_iter()
    .map(|(value, label)| SelectOption {
        value: value.to_string(),
        label,
        selected: value == page_size,
    })
    .collect()
}
