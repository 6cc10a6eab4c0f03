//! Recipe URLs.
//!
//! Recipes are articles named `recipe-<source>-to-<sink>` and published
//! under `/recipe/<source>/<sink>`.

use axum::extract::Path;
use axum::response::Response;
use docshelf_catalog::recipe_article_id;

use crate::handlers::moved_permanently;

/// Handle GET /recipe/apache/{sink}.
pub(crate) async fn get_apache_recipe(Path(sink): Path<String>) -> Response {
    moved_permanently(&format!("/recipe/apache-logs/{sink}"))
}

/// Handle GET /recipe/{source}/{sink}.
pub(crate) async fn get_recipe(Path((source, sink)): Path<(String, String)>) -> Response {
    let article = recipe_article_id(&source, &sink);
    tracing::info!(article = %article, "Recipe requested");
    moved_permanently(&format!("/articles/{article}"))
}
