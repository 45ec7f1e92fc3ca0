//! Paginated HTML listing pages
//!
//! - `GET /` (home): lenient page lookup, fixed page size. Any unusable
//!   `page` lands on a valid page.
//! - `GET /catalog/`: strict page lookup (`page` is an integer or `last`,
//!   anything else is 404) with an optional `page_size` override.
//!
//! Both render the same embedded template.

use axum::{
    extract::{Query, State},
    response::Html,
};
use cinemerit_common::db::{self, MovieFilter, MovieRecord};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::pagination::{Page, Paginator};
use crate::AppState;

const INDEX_HTML: &str = include_str!("../ui/index.html");

/// Query parameters for the home page
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Page number (1-indexed), kept raw so bad input can fall back
    pub page: Option<String>,
}

/// Query parameters for the catalog page
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Page number (1-indexed) or `last`
    pub page: Option<String>,

    /// Records per page, overriding the configured size
    pub page_size: Option<String>,
}

/// GET /
pub async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> ApiResult<Html<String>> {
    let total = db::count_movies(&state.db, &MovieFilter::All).await?;
    let paginator = Paginator::new(total, state.pagination.home_page_size);
    let page = paginator.get_page(query.page.as_deref());

    let movies = db::list_movies_page(&state.db, &MovieFilter::All, page.per_page, page.offset)
        .await?;

    Ok(Html(render_movie_page("Movies", "/", &movies, &page, None)))
}

/// GET /catalog/
pub async fn catalog_page(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Html<String>> {
    let per_page = effective_page_size(
        query.page_size.as_deref(),
        state.pagination.list_page_size,
        state.pagination.max_page_size,
    );
    let override_size = query.page_size.as_ref().map(|_| per_page);

    let total = db::count_movies(&state.db, &MovieFilter::All).await?;
    let paginator = Paginator::new(total, per_page);
    let page = paginator
        .parse_page(query.page.as_deref())
        .map_err(|e| ApiError::NotFound(format!("Invalid page: {}", e)))?;

    let movies = db::list_movies_page(&state.db, &MovieFilter::All, page.per_page, page.offset)
        .await?;

    Ok(Html(render_movie_page(
        "Movie Catalog",
        "/catalog/",
        &movies,
        &page,
        override_size,
    )))
}

/// Positive overrides are capped at `max`; anything unparsable uses `default`
fn effective_page_size(raw: Option<&str>, default: i64, max: i64) -> i64 {
    match raw.and_then(|text| text.trim().parse::<i64>().ok()) {
        Some(size) if size > 0 => size.min(max),
        _ => default,
    }
}

/// Render one page of movies with navigation
///
/// The unclamped neighbour numbers are exposed as `data-` attributes on the
/// navigation element; links are only rendered for pages that exist.
pub fn render_movie_page(
    title: &str,
    base_path: &str,
    movies: &[MovieRecord],
    page: &Page,
    page_size: Option<i64>,
) -> String {
    let summary = format!(
        "{} movie{} in total.",
        page.count,
        if page.count == 1 { "" } else { "s" }
    );

    let rows = if movies.is_empty() {
        "            <tr><td colspan=\"4\" class=\"empty\">No movies yet.</td></tr>".to_string()
    } else {
        movies
            .iter()
            .map(render_row)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let title = escape_html(title);
    let navigation = render_navigation(base_path, page, page_size);

    fill_template(
        INDEX_HTML,
        &[
            ("TITLE", title.as_str()),
            ("SUMMARY", summary.as_str()),
            ("ROWS", rows.as_str()),
            ("NAVIGATION", navigation.as_str()),
            ("VERSION", env!("CARGO_PKG_VERSION")),
        ],
    )
}

fn render_row(movie: &MovieRecord) -> String {
    format!(
        "            <tr data-id=\"{}\"><td>{}</td><td class=\"number\">{}</td><td class=\"number\">{}</td><td>{}</td></tr>",
        movie.id,
        escape_html(&movie.name),
        movie.duration,
        movie.rating,
        movie.genre.as_deref().map(escape_html).unwrap_or_default(),
    )
}

fn render_navigation(base_path: &str, page: &Page, page_size: Option<i64>) -> String {
    let href = |number: i64| match page_size {
        Some(size) => format!("{}?page={}&amp;page_size={}", base_path, number, size),
        None => format!("{}?page={}", base_path, number),
    };

    let mut links = Vec::new();
    if page.has_previous() {
        links.push(format!("<a href=\"{}\">&laquo; first</a>", href(1)));
        links.push(format!(
            "<a href=\"{}\" rel=\"prev\">previous</a>",
            href(page.prev_page_num())
        ));
    }
    links.push(format!(
        "<span class=\"current\">Page {} of {}</span>",
        page.number, page.total_pages
    ));
    if page.has_next() {
        links.push(format!(
            "<a href=\"{}\" rel=\"next\">next</a>",
            href(page.next_page_num())
        ));
        links.push(format!("<a href=\"{}\">last &raquo;</a>", href(page.total_pages)));
    }

    format!(
        "    <nav class=\"pagination\" data-page=\"{}\" data-prev-page=\"{}\" data-next-page=\"{}\" data-total-pages=\"{}\">\n        {}\n    </nav>",
        page.number,
        page.prev_page_num(),
        page.next_page_num(),
        page.total_pages,
        links.join("\n        "),
    )
}

/// Single-pass `{{KEY}}` substitution; inserted values are never rescanned
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
