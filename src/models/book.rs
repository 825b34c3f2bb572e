//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{author::AuthorView, genre::GenreView};
use crate::validation::{field_errors, parse_id, sanitize, FieldError};

/// Book record. `author` and `genre` hold references, resolved at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/books/{}", self.id)
    }

    /// Display form with references resolved. A missing author stays `None`.
    pub fn view(&self, author: Option<AuthorView>, genres: Vec<GenreView>) -> BookView {
        BookView {
            id: self.id,
            title: self.title.clone(),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            url: self.url(),
            author,
            genre: genres,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorView>,
    pub genre: Vec<GenreView>,
}

/// Raw book form submission; `genre` repeats once per checked box
#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "crate::validation::identifier", message = "Author must not be empty.")
    )]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    #[validate(custom(function = "crate::validation::identifiers", message = "Invalid genre."))]
    pub genre: Vec<String>,
}

impl BookInput {
    const FIELDS: [&'static str; 5] = ["title", "author", "summary", "isbn", "genre"];

    pub fn errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e, &Self::FIELDS),
        }
    }

    /// Build the record with text fields escaped. Unparseable references
    /// become the nil id (author) or are dropped (genres); only rejected input
    /// reaches that case.
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: sanitize(&self.title),
            author: parse_id(&self.author).unwrap_or_else(Uuid::nil),
            summary: sanitize(&self.summary),
            isbn: sanitize(&self.isbn),
            genre: self.genre.iter().filter_map(|g| parse_id(g)).collect(),
        }
    }
}

impl From<BookForm> for BookInput {
    fn from(form: BookForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            author: form.author.trim().to_string(),
            summary: form.summary.trim().to_string(),
            isbn: form.isbn.trim().to_string(),
            genre: form
                .genre
                .iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }
}
