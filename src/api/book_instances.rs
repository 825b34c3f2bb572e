//! Book instance (copy) pages

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
    models::{BookInstanceForm, BookInstanceView, BookRef, BookStatus},
    services::Submission,
    views::{Page, View},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_book_instances))
        .route("/create", get(create_form).post(create_book_instance))
        .route("/:id", get(get_book_instance))
        .route("/:id/update", get(update_form).post(update_book_instance))
        .route("/:id/delete", get(delete_form).post(delete_book_instance))
}

/// List all copies, by book title
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Response> {
    let instances: Vec<BookInstanceView> = state
        .services
        .book_instances
        .list()
        .await?
        .iter()
        .map(|(instance, book)| instance.view(book.as_ref().map(BookRef::from)))
        .collect();

    respond(
        &state,
        View::new("bookinstance/list", "Book Instance List").with("bookinstance_list", instances),
    )
}

/// Show one copy with its book
pub async fn get_book_instance(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book copy")?;
    let (instance, book) = state.services.book_instances.get_with_book(id).await?;

    let title = match &book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Copy".to_string(),
    };
    respond(
        &state,
        View::new("bookinstance/detail", title).with("bookinstance", instance.view(book.as_ref().map(BookRef::from))),
    )
}

/// Form page with every book to attach the copy to. The selected book is the
/// submitted one, so it survives a rejected submission even when it is not
/// a valid id.
async fn form_page(
    state: &AppState,
    title: &'static str,
    instance: Option<BookInstanceView>,
    selected_book: Option<String>,
) -> AppResult<View> {
    let books: Vec<BookRef> = state
        .services
        .book_instances
        .book_options()
        .await?
        .iter()
        .map(BookRef::from)
        .collect();
    let statuses: Vec<&'static str> = BookStatus::ALL.iter().map(BookStatus::as_str).collect();

    let mut view = View::new("bookinstance/form", title)
        .with("book_list", books)
        .with("statuses", statuses);
    if let Some(selected) = selected_book.filter(|s| !s.is_empty()) {
        view = view.with("selected_book", selected);
    }
    if let Some(instance) = instance {
        view = view.with("bookinstance", instance);
    }
    Ok(view)
}

/// Empty copy form
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let view = form_page(&state, "Create BookInstance", None, None).await?;
    respond(&state, view)
}

/// Create a copy
pub async fn create_book_instance(
    State(state): State<AppState>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let selected = form.book.trim().to_string();
    let (status, due_back) = (form.status.clone(), form.due_back.clone());
    let page = match state.services.book_instances.create(form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/bookinstances".to_string()),
        Submission::Rejected { entity, errors } => {
            let submitted = entity.view(None).with_submitted(status.as_deref(), due_back.as_deref());
            form_page(&state, "Create BookInstance", Some(submitted), Some(selected))
                .await?
                .with("errors", errors)
                .into()
        }
    };
    respond(&state, page)
}

/// Copy form filled with the stored values
pub async fn update_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book copy")?;
    let instance = state.services.book_instances.get(id).await?;
    let selected = instance.book.to_string();
    let view = form_page(&state, "Update BookInstance", Some(instance.view(None)), Some(selected)).await?;
    respond(&state, view)
}

/// Replace a copy
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Book copy")?;
    let selected = form.book.trim().to_string();
    let (status, due_back) = (form.status.clone(), form.due_back.clone());
    let page = match state.services.book_instances.update(id, form).await? {
        Submission::Saved(_) | Submission::Existing(_) => Page::Redirect("/catalog/bookinstances".to_string()),
        Submission::Rejected { entity, errors } => {
            let submitted = entity.view(None).with_submitted(status.as_deref(), due_back.as_deref());
            form_page(&state, "Update BookInstance", Some(submitted), Some(selected))
                .await?
                .with("errors", errors)
                .into()
        }
    };
    respond(&state, page)
}

/// Delete confirmation
pub async fn delete_form(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let id = path_id(&id, "Book copy")?;
    let (instance, book) = state.services.book_instances.get_with_book(id).await?;

    respond(
        &state,
        View::new("bookinstance/delete", "Delete BookInstance")
            .with("bookinstance", instance.view(book.as_ref().map(BookRef::from))),
    )
}

/// Delete a copy
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Response> {
    let id = path_id(&id, "Book copy")?;
    form.check(id)?;

    state.services.book_instances.delete(id).await?;
    respond(&state, Page::Redirect("/catalog/bookinstances".to_string()))
}
