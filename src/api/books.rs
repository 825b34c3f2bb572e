//! Book pages

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
    models::{Book, BookForm, BookInstanceView, BookView, GenreView},
    services::Submission,
    views::{Page, View},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books))
        .route("/create", get(create_form).post(create_book))
        .route("/:id", get(get_book))
        .route("/:id/update", get(update_form).post(update_book))
        .route("/:id/delete", get(delete_form).post(delete_book))
}

/// List all books
pub async fn list_books(State(state): State<AppState>) -> AppResult<Response> {
    let books: Vec<BookView> = state
        .services
        .books
        .list()
        .await?
        .iter()
        .map(|(book, author)| book.view(author.as_ref().map(|a| a.view()), Vec::new()))
        .collect();

    respond(&state, View::new("book/list", "Book List").with("book_list", books))
}

/// Show a book with its author, genres and copies
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book")?;
    let detail = state.services.books.detail(id).await?;

    let genres: Vec<GenreView> = detail.genres.iter().map(|g| g.view()).collect();
    let book = detail.book.view(detail.author.as_ref().map(|a| a.view()), genres);
    let instances: Vec<BookInstanceView> = detail.instances.iter().map(|i| i.view(None)).collect();

    respond(
        &state,
        View::new("book/detail", book.title.clone())
            .with("book", book)
            .with("book_instances", instances),
    )
}

/// Form page with every author and genre to choose from
async fn form_page(state: &AppState, title: &'static str, book: Option<&Book>) -> AppResult<View> {
    let (authors, genres) = state.services.books.form_options().await?;
    let authors: Vec<_> = authors.iter().map(|a| a.view()).collect();
    let genres: Vec<GenreView> = genres.iter().map(|g| g.view()).collect();

    let mut view = View::new("book/form", title).with("authors", authors).with("genres", genres);
    if let Some(book) = book {
        view = view.with("book", book);
    }
    Ok(view)
}

/// Empty book form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let view = form_page(&state, "Create Book", None).await?;
    respond(&state, view)
}

/// Create a book
pub async fn create_book(State(state): State<AppState>, Form(form): Form<BookForm>) -> AppResult<Response> {
    let page = match state.services.books.create(form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/books".to_string()),
        Submission::Rejected { entity, errors } => form_page(&state, "Create Book", Some(&entity))
            .await?
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Book form filled with the stored values
pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book")?;
    let book = state.services.books.get(id).await?;
    let view = form_page(&state, "Update Book", Some(&book)).await?;
    respond(&state, view)
}

/// Replace a book
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Book")?;
    let page = match state.services.books.update(id, form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/books".to_string()),
        Submission::Rejected { entity, errors } => form_page(&state, "Update Book", Some(&entity))
            .await?
            .with("errors", errors)
            .into(),
    };
    respond(&state, page)
}

/// Delete confirmation listing the book's copies
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book")?;
    let (book, instances) = state.services.books.get_with_instances(id).await?;
    let instances: Vec<BookInstanceView> = instances.iter().map(|i| i.view(None)).collect();

    respond(
        &state,
        View::new("book/delete", "Delete Book")
            .with("book", book.view(None, Vec::new()))
            .with("book_instances", instances),
    )
}

/// Copies of the book are left in place
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Book")?;
    form.check(id)?;

    state.services.books.delete(id).await?;
    respond(&state, Page::Redirect("/catalog/books".to_string()))
}
