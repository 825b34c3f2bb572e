//! Author pages

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use axum_extra::extract::Form;

use super::{path_id, respond, DeleteForm};
use crate::{
    error::AppResult,
    models::{AuthorForm, AuthorView, BookRef},
    services::{Removal, Submission},
    views::{Page, View},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors))
        .route("/create", get(create_form).post(create_author))
        .route("/:id", get(get_author))
        .route("/:id/update", get(update_form).post(update_author))
        .route("/:id/delete", get(delete_form).post(delete_author))
}

/// List all authors
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Response> {
    let authors: Vec<AuthorView> = state
        .services
        .authors
        .list()
        .await?
        .iter()
        .map(|a| a.view())
        .collect();

    respond(&state, View::new("author/list", "Author List").with("author_list", authors))
}

/// Show an author with their books
pub async fn get_author(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Author")?;
    let (author, books) = state.services.authors.get_with_books(id).await?;
    let books: Vec<BookRef> = books.iter().map(BookRef::from).collect();

    respond(
        &state,
        View::new("author/detail", "Author Detail")
            .with("author", author.view())
            .with("author_books", books),
    )
}

/// Empty author form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    respond(&state, View::new("author/form", "Create Author"))
}

/// Create an author
pub async fn create_author(State(state): State<AppState>, Form(form): Form<AuthorForm>) -> AppResult<Response> {
    let page = match state.services.authors.create(form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/authors".to_string()),
        Submission::Rejected { entity, errors } => View::new("author/form", "Create Author")
            .with("author", entity.view())
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Author form filled with the stored values
pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Author")?;
    let author = state.services.authors.get(id).await?;

    respond(&state, View::new("author/form", "Update Author").with("author", author.view()))
}

/// Replace an author
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Author")?;
    let page = match state.services.authors.update(id, form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/authors".to_string()),
        Submission::Rejected { entity, errors } => View::new("author/form", "Update Author")
            .with("author", entity.view())
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Delete confirmation listing the author's books
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Author")?;
    let (author, books) = state.services.authors.get_with_books(id).await?;
    let books: Vec<BookRef> = books.iter().map(BookRef::from).collect();

    respond(
        &state,
        View::new("author/delete", "Delete Author")
            .with("author", author.view())
            .with("author_books", books),
    )
}

/// Delete an author unless books still reference them
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Author")?;
    form.check(id)?;

    let page = match state.services.authors.delete(id).await? {
        Removal::Deleted => Page::Redirect("/catalog/authors".to_string()),
        Removal::Blocked { entity, dependents } => {
            let books: Vec<BookRef> = dependents.iter().map(BookRef::from).collect();
            View::new("author/delete", "Delete Author")
                .with("author", entity.view())
                .with("author_books", books)
                .into()
        }
    };
    respond(&state, page)
}
