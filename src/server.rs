use std::path::PathBuf;
use std::sync::Arc;
use std::{fs, io};

use anyhow::{Context, Result};
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::config::Config;
use crate::content::render_body;
use crate::paginator::Paginator;
use crate::query_string::QueryString;
use crate::store::{Archive, ConfidenceFilter, SearchParams, SortOrder};
use crate::text_utils::DateWindow;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;

const PAGE_SIZES: [u32; 3] = [25, 50, 100];

struct AppState {
    config: Config,
    archive: Archive,
    window: DateWindow,
}

fn read_template(tpl_dir: &PathBuf, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    fs::read_to_string(full_path)
}

// Begin: Redirect region --------
#[web::get("/")]
async fn index() -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", "/list")
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/view/{post}")]
async fn view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", path.into_inner() + "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}
// End: Redirect region --------

fn search_params_from(qs: &QueryString, page_size: u32) -> SearchParams {
    SearchParams {
        title_query: qs.get("title").to_string(),
        body_query: qs.get("body").to_string(),
        confidence: ConfidenceFilter::parse(qs.get("confidence")),
        sort: SortOrder::parse(qs.get("sort")),
        limit: page_size as i64,
        offset: 0,
    }
}

async fn render_list_page(state: &AppState, qs: &QueryString) -> Result<String> {
    let mut page_size = qs.get_u32_or("page_size", state.config.defaults.page_size);
    if !PAGE_SIZES.contains(&page_size) {
        page_size = state.config.defaults.page_size;
    }

    let mut params = search_params_from(qs, page_size);
    let requested_page = qs.get_page();
    params.offset = ((requested_page - 1) as i64) * (page_size as i64);

    let (total, mut posts) = state.archive.search(&params).await?;
    let paginator = Paginator::from(total, page_size);

    // A stale page number (filters changed, bookmarks) lands past the end;
    // fold it back to page 1 the way an out-of-range request is handled
    let mut cur_page = requested_page;
    if posts.is_empty() && total > 0 {
        cur_page = paginator.clamp(requested_page);
        params.offset = paginator.offset(cur_page);
        posts = state.archive.search(&params).await?.1;
    }

    let stats = state.archive.stats().await?;

    let template_src = read_template(&state.config.paths.template_dir, "postlist.tpl")?;
    let renderer = ListRenderer::new(&template_src)?;
    Ok(renderer.render(
        &state.config.archive.author,
        &posts,
        &stats,
        &params,
        total,
        cur_page,
        paginator.page_count(),
        page_size,
        &state.window,
    ))
}

#[web::get("/list")]
async fn list(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or(""));

    match render_list_page(&state, &qs).await {
        Ok(body) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Error listing posts: {}", e);
            web::HttpResponse::InternalServerError().body(format!("Error listing posts: {}", e))
        }
    }
}

async fn render_post_page(state: &AppState, id: i64) -> Result<Option<String>> {
    let post = match state.archive.get_post(id).await? {
        Some(post) => post,
        None => return Ok(None),
    };

    let body = render_body(&post);

    let template_src = read_template(&state.config.paths.template_dir, "view.tpl")?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(Some(renderer.render(&post, &body, &state.window)))
}

#[web::get("/view/{post}/")]
async fn view(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> web::HttpResponse {
    let id: i64 = match path.parse() {
        Ok(id) => id,
        Err(_) => return web::HttpResponse::NotFound().body("Post not found."),
    };

    match render_post_page(&state, id).await {
        Ok(Some(body)) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Ok(None) => web::HttpResponse::NotFound().body("Post not found."),
        Err(e) => {
            error!("Error loading post {}: {}", id, e);
            web::HttpResponse::InternalServerError().body(format!("Error loading post {}: {}", id, e))
        }
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(
    path: web::types::Path<String>,
    state: web::types::State<Arc<AppState>>,
) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> Result<()> {
    let archive = Archive::open(
        &config.paths.db_path,
        &config.archive.author,
        &config.archive.min_date_iso(),
        &config.archive.max_date_iso(),
    )
    .await
    .with_context(|| {
        format!(
            "Error opening archive database {}",
            config.paths.db_path.display()
        )
    })?;

    let stats = archive.stats().await?;
    info!(
        "Archive opened: {} posts by {} ({} dated, {} undated)",
        stats.author_posts, config.archive.author, stats.dated, stats.undated
    );

    let window = DateWindow::new(config.archive.min_date.0, config.archive.max_date.0);
    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState {
        config,
        archive,
        window,
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(public_files)
            .service(list)
            .service(view)
            .service(view_wo_slash)
    })
    .bind((bind_addr, bind_port))?
    .run()
    .await?;

    Ok(())
}
