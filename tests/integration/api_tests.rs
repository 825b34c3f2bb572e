//! Router integration tests, run in process against the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use catalog_server::{
    config::{AppConfig, StoreBackend},
    models::{AuthorForm, BookForm},
    repository::Repository,
    services::Submission,
    AppState,
};

fn setup() -> (AppState, Router) {
    let mut config = AppConfig::default();
    config.database.backend = StoreBackend::Memory;
    let state = AppState::new(config, Repository::in_memory());
    let app = catalog_server::api::router(state.clone());
    (state, app)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn author(state: &AppState, first: &str, family: &str) -> Uuid {
    let form = AuthorForm {
        first_name: first.into(),
        family_name: family.into(),
        date_of_birth: None,
        date_of_death: None,
    };
    match state.services.authors.create(form).await.unwrap() {
        Submission::Saved(author) => author.id,
        other => panic!("author not saved: {:?}", other),
    }
}

async fn book(state: &AppState, title: &str, author: Uuid) -> Uuid {
    let form = BookForm {
        title: title.into(),
        author: author.to_string(),
        summary: "A summary".into(),
        isbn: "9780000000000".into(),
        genre: vec![],
    };
    match state.services.books.create(form).await.unwrap() {
        Submission::Saved(book) => book.id,
        other => panic!("book not saved: {:?}", other),
    }
}

#[tokio::test]
async fn test_health_check() {
    let (_, app) = setup();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");

    let response = get(&app, "/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_home_redirects_to_books() {
    let (_, app) = setup();
    for uri in ["/", "/catalog"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/books");
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (_, app) = setup();
    let response = get(&app, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genre_duplicate_redirects_to_existing() {
    let (state, app) = setup();

    let response = post_form(&app, "/catalog/genres/create", "name=Fiction").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/genres");

    let genres = state.services.genres.list().await.unwrap();
    assert_eq!(genres.len(), 1);
    let fiction = &genres[0];

    let response = post_form(&app, "/catalog/genres/create", "name=FICTION").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/catalog/genres/{}", fiction.id));
    assert_eq!(state.services.genres.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_author_is_not_found() {
    let (_, app) = setup();

    let response = get(&app, &format!("/catalog/authors/{}", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Author not found"));

    let response = get(&app, "/catalog/authors/not-an-id").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, &format!("/catalog/authors/{}/update", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_with_books_is_not_deleted() {
    let (state, app) = setup();
    let id = author(&state, "Frank", "Herbert").await;
    book(&state, "Dune", id).await;
    book(&state, "Children of Dune", id).await;

    let response = post_form(&app, &format!("/catalog/authors/{}/delete", id), &format!("authorid={}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Dune"));
    assert!(html.contains("Children of Dune"));
    assert!(state.services.authors.get(id).await.is_ok());
}

#[tokio::test]
async fn test_author_without_books_is_deleted() {
    let (state, app) = setup();
    let id = author(&state, "Frank", "Herbert").await;

    let response = post_form(&app, &format!("/catalog/authors/{}/delete", id), &format!("authorid={}", id)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");
    assert!(state.services.authors.get(id).await.is_err());

    // Already gone: still a redirect
    let response = post_form(&app, &format!("/catalog/authors/{}/delete", id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_mismatched_delete_id_is_bad_request() {
    let (state, app) = setup();
    let id = author(&state, "Frank", "Herbert").await;

    let response = post_form(
        &app,
        &format!("/catalog/authors/{}/delete", id),
        &format!("authorid={}", Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.services.authors.get(id).await.is_ok());
}

#[tokio::test]
async fn test_invalid_author_form_is_rerendered() {
    let (state, app) = setup();

    let response = post_form(&app, "/catalog/authors/create", "first_name=Al&family_name=Herbert").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("First name must be specified."));
    assert!(html.contains("value=\"Herbert\""));
    assert!(state.services.authors.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_book_with_several_genres() {
    let (state, app) = setup();
    let author_id = author(&state, "Ursula", "LeGuin").await;
    post_form(&app, "/catalog/genres/create", "name=Fantasy").await;
    post_form(&app, "/catalog/genres/create", "name=Science").await;
    let genres = state.services.genres.list().await.unwrap();

    let body = format!(
        "title=Earthsea&author={}&summary=Wizards&isbn=9780547773742&genre={}&genre={}",
        author_id, genres[0].id, genres[1].id
    );
    let response = post_form(&app, "/catalog/books/create", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/books");

    let (book, _) = state.services.books.list().await.unwrap().remove(0);
    assert_eq!(book.genre.len(), 2);

    let response = get(&app, &format!("/catalog/books/{}", book.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Fantasy"));
    assert!(html.contains("LeGuin, Ursula"));
}

#[tokio::test]
async fn test_book_instance_lifecycle() {
    let (state, app) = setup();
    let author_id = author(&state, "Frank", "Herbert").await;
    let book_id = book(&state, "Dune", author_id).await;

    let body = format!("book={}&imprint=Chilton+1965&status=Loaned&due_back=2026-12-01", book_id);
    let response = post_form(&app, "/catalog/bookinstances/create", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = get(&app, "/catalog/bookinstances").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Chilton 1965"));
    assert!(html.contains("Dune"));

    let (instance, _) = state.services.book_instances.list().await.unwrap().remove(0);
    let response = post_form(
        &app,
        &format!("/catalog/bookinstances/{}/delete", instance.id),
        &format!("bookinstanceid={}", instance.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/bookinstances");
    assert!(state.services.book_instances.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_short_imprint_keeps_selected_book() {
    let (state, app) = setup();
    let author_id = author(&state, "Frank", "Herbert").await;
    let book_id = book(&state, "Dune", author_id).await;

    let body = format!("book={}&imprint=ab&status=Available", book_id);
    let response = post_form(&app, "/catalog/bookinstances/create", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Imprint must be at least three characters long."));
    assert!(html.contains(&format!("<option value=\"{}\" selected>Dune</option>", book_id)));
    assert!(state.services.book_instances.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_genre_delete_page_is_not_found() {
    let (_, app) = setup();

    let response = get(&app, &format!("/catalog/genres/{}/delete", Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Genre not found"));
}

#[tokio::test]
async fn test_genre_with_books_is_not_deleted() {
    let (state, app) = setup();
    post_form(&app, "/catalog/genres/create", "name=Fantasy").await;
    let genre_id = state.services.genres.list().await.unwrap()[0].id;

    let author_id = author(&state, "Ursula", "LeGuin").await;
    let form = BookForm {
        title: "Earthsea".into(),
        author: author_id.to_string(),
        summary: "Wizards".into(),
        isbn: "9780547773742".into(),
        genre: vec![genre_id.to_string()],
    };
    assert!(matches!(state.services.books.create(form).await.unwrap(), Submission::Saved(_)));

    let response = post_form(
        &app,
        &format!("/catalog/genres/{}/delete", genre_id),
        &format!("genreid={}", genre_id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Earthsea"));
    assert!(!html.contains("name=\"genreid\""));
    assert!(state.services.genres.get(genre_id).await.is_ok());
}

#[tokio::test]
async fn test_genre_name_length_counts_typed_characters() {
    let (state, app) = setup();

    // "<>" is two characters even though it is stored escaped
    let response = post_form(&app, "/catalog/genres/create", "name=%3C%3E").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Genre name must contain at least 3 characters"));
    assert!(state.services.genres.list().await.unwrap().is_empty());

    // A hundred ampersands are within the limit
    let response = post_form(&app, "/catalog/genres/create", &format!("name={}", "%26".repeat(100))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let genres = state.services.genres.list().await.unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].name, "&amp;".repeat(100));
}

#[tokio::test]
async fn test_rejected_copy_keeps_submitted_status_and_date() {
    let (state, app) = setup();
    let author_id = author(&state, "Frank", "Herbert").await;
    let book_id = book(&state, "Dune", author_id).await;

    let body = format!("book={}&imprint=Chilton+1965&status=Loaned&due_back=soon", book_id);
    let response = post_form(&app, "/catalog/bookinstances/create", &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<option value=\"Loaned\" selected>Loaned</option>"));
    assert!(html.contains("name=\"due_back\" value=\"soon\""));
    assert!(state.services.book_instances.list().await.unwrap().is_empty());
}
