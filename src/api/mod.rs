//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    validation::parse_id,
    views::{Page, View},
    AppState,
};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/catalog", get(home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog/authors", authors::routes())
        .nest("/catalog/genres", genres::routes())
        .nest("/catalog/books", books::routes())
        .nest("/catalog/bookinstances", book_instances::routes())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn home() -> Redirect {
    Redirect::to("/catalog/books")
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    tracing::debug!("No route for {}", uri);
    let view = View::new("error", "Not Found")
        .with("message", "Not Found")
        .with("status", StatusCode::NOT_FOUND.as_u16());
    match state.views.render(&view) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => AppError::NotFound("Not Found".to_string()).into_response(),
    }
}

/// Turn a handler outcome into a response
pub(crate) fn respond(state: &AppState, page: impl Into<Page>) -> AppResult<Response> {
    match page.into() {
        Page::Render(view) => Ok(Html(state.views.render(&view)?).into_response()),
        Page::Redirect(to) => Ok(Redirect::to(&to).into_response()),
    }
}

/// Parse a path identifier; anything that is not an id cannot name a record
pub(crate) fn path_id(raw: &str, what: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(|| AppError::NotFound(format!("{} not found", what)))
}

/// Body of a delete confirmation. The form names the id after the resource.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(
        default,
        alias = "authorid",
        alias = "genreid",
        alias = "bookid",
        alias = "bookinstanceid"
    )]
    pub id: Option<String>,
}

impl DeleteForm {
    /// The route id wins; a body id, when sent, has to agree with it
    pub fn check(&self, route_id: Uuid) -> AppResult<()> {
        match self.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(()),
            Some(raw) if parse_id(raw) == Some(route_id) => Ok(()),
            Some(raw) => {
                tracing::warn!("Delete of {} sent mismatching body id '{}'", route_id, raw);
                Err(AppError::BadRequest("Identifier mismatch".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_form_check() {
        let id = Uuid::new_v4();
        assert!(DeleteForm { id: None }.check(id).is_ok());
        assert!(DeleteForm { id: Some(String::new()) }.check(id).is_ok());
        assert!(DeleteForm { id: Some(id.to_string()) }.check(id).is_ok());

        let err = DeleteForm { id: Some(Uuid::new_v4().to_string()) }.check(id).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = DeleteForm { id: Some("garbage".into()) }.check(id).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_path_id() {
        assert!(path_id("not-an-id", "Author").is_err());
        let id = Uuid::new_v4();
        assert_eq!(path_id(&id.to_string(), "Author").unwrap(), id);
    }
}
