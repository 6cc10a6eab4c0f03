//! Crawler endpoints: `/sitemap.xml` and `/robots.txt`.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use quick_xml::escape::escape;

use crate::state::AppState;

const ROBOTS_TXT: &str = "User-agent: *\nSitemap: /sitemap.xml\n";

/// Handle GET /robots.txt.
pub(crate) async fn get_robots() -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], ROBOTS_TXT).into_response()
}

/// Handle GET /sitemap.xml.
///
/// Lists the default version's articles in TOC order.
pub(crate) async fn get_sitemap(State(state): State<Arc<AppState>>) -> Response {
    let catalog = &state.catalog;
    let default_language = catalog.naming().default_language();
    let entries = catalog.sitemap_articles(None).into_iter().map(|id| {
        let lastmod = catalog
            .last_updated()
            .get(default_language, id)
            .map(|ts| ts.format("%Y-%m-%d").to_string());
        (id, lastmod)
    });

    let xml = render_sitemap(&state.base_url, entries);
    ([(header::CONTENT_TYPE, "text/xml")], xml).into_response()
}

/// Render sitemap XML for `(article id, lastmod)` pairs.
fn render_sitemap<'a>(
    base_url: &str,
    entries: impl IntoIterator<Item = (&'a str, Option<String>)>,
) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (id, lastmod) in entries {
        let loc = format!("{base_url}/articles/{id}");
        let _ = write!(xml, "  <url>\n    <loc>{}</loc>\n", escape(loc.as_str()));
        if let Some(lastmod) = lastmod {
            let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
