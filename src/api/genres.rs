//! Genre pages

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
    models::{BookRef, GenreForm, GenreView},
    services::{Removal, Submission},
    views::{Page, View},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genres))
        .route("/create", get(create_form).post(create_genre))
        .route("/:id", get(get_genre))
        .route("/:id/update", get(update_form).post(update_genre))
        .route("/:id/delete", get(delete_form).post(delete_genre))
}

/// List all genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Response> {
    let genres: Vec<GenreView> = state.services.genres.list().await?.iter().map(|g| g.view()).collect();
    respond(&state, View::new("genre/list", "Genre List").with("genre_list", genres))
}

/// Show a genre with its books
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Genre")?;
    let (genre, books) = state.services.genres.get_with_books(id).await?;
    let books: Vec<BookRef> = books.iter().map(BookRef::from).collect();

    respond(
        &state,
        View::new("genre/detail", "Genre Detail")
            .with("genre", genre.view())
            .with("genre_books", books),
    )
}

/// Empty genre form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    respond(&state, View::new("genre/form", "Create Genre"))
}

/// A name matching an existing genre sends the client to that genre
pub async fn create_genre(State(state): State<AppState>, Form(form): Form<GenreForm>) -> AppResult<Response> {
    let page = match state.services.genres.create(form).await? {
        Submission::Saved(_) => Page::Redirect("/catalog/genres".to_string()),
        Submission::Existing(existing) => Page::Redirect(existing.url()),
        Submission::Rejected { entity, errors } => View::new("genre/form", "Create Genre")
            .with("genre", entity.view())
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Genre form filled with the stored values
pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Genre")?;
    let genre = state.services.genres.get(id).await?;
    respond(&state, View::new("genre/form", "Update Genre").with("genre", genre.view()))
}

/// Rename a genre
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Genre")?;
    let page = match state.services.genres.update(id, form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/genres".to_string()),
        Submission::Rejected { entity, errors } => View::new("genre/form", "Update Genre")
            .with("genre", entity.view())
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Delete confirmation listing the genre's books
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Genre")?;
    let (genre, books) = state.services.genres.get_with_books(id).await?;
    let books: Vec<BookRef> = books.iter().map(BookRef::from).collect();

    respond(
        &state,
        View::new("genre/delete", "Delete Genre")
            .with("genre", genre.view())
            .with("genre_books", books),
    )
}

/// Delete a genre unless books are still filed under it
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Genre")?;
    form.check(id)?;

    let page = match state.services.genres.delete(id).await? {
        Removal::Deleted => Page::Redirect("/catalog/genres".to_string()),
        Removal::Blocked { entity, dependents } => {
            let books: Vec<BookRef> = dependents.iter().map(BookRef::from).collect();
            View::new("genre/delete", "Delete Genre")
                .with("genre", entity.view())
                .with("genre_books", books)
                .into()
        }
    };
    respond(&state, page)
}
