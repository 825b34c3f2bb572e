//! Book instance (physical copy) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use uuid::Uuid;
use validator::Validate;

use super::author::DATE_MED;
use crate::validation::{field_errors, parse_id, parse_iso8601, sanitize, trim_optional, FieldError};

/// Availability of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    /// Order used by the instance form
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Maintenance,
        BookStatus::Available,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookStatus::Available),
            "Maintenance" => Ok(BookStatus::Maintenance),
            "Loaned" => Ok(BookStatus::Loaned),
            "Reserved" => Ok(BookStatus::Reserved),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Stored as TEXT
impl sqlx::Type<Postgres> for BookStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: DateTime<Utc>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstances/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        self.due_back.format(DATE_MED).to_string()
    }

    pub fn due_back_yyyy_mm_dd(&self) -> String {
        self.due_back.date_naive().to_string()
    }

    /// Display form; `book` is the resolved reference, `None` when it is broken
    pub fn view(&self, book: Option<BookRef>) -> BookInstanceView {
        BookInstanceView {
            id: self.id,
            book_id: self.book,
            imprint: self.imprint.clone(),
            status: self.status.as_str().to_string(),
            due_back: self.due_back,
            url: self.url(),
            due_back_formatted: self.due_back_formatted(),
            due_back_yyyy_mm_dd: self.due_back_yyyy_mm_dd(),
            book,
        }
    }
}

/// Title and link of the book a copy belongs to
#[derive(Debug, Clone, Serialize)]
pub struct BookRef {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

impl From<&super::book::Book> for BookRef {
    fn from(book: &super::book::Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            url: book.url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    /// A [`BookStatus`] name, or the text submitted with a rejected form
    pub status: String,
    pub due_back: DateTime<Utc>,
    pub url: String,
    pub due_back_formatted: String,
    pub due_back_yyyy_mm_dd: String,
    pub book: Option<BookRef>,
}

impl BookInstanceView {
    /// Show the status and due date as typed, instead of the defaults the
    /// record fell back to. Used when a rejected form is shown again.
    pub fn with_submitted(mut self, status: Option<&str>, due_back: Option<&str>) -> Self {
        if let Some(status) = trim_optional(status) {
            self.status = status;
        }
        if let Some(due_back) = trim_optional(due_back) {
            self.due_back_yyyy_mm_dd = due_back;
        }
        self
    }
}

/// Raw book instance form submission
#[derive(Debug, Default, Deserialize)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct BookInstanceInput {
    #[validate(
        length(min = 3, message = "Book must be specified"),
        custom(function = "crate::validation::identifier", message = "Book must be specified")
    )]
    pub book: String,
    #[validate(length(min = 3, message = "Imprint must be at least three characters long."))]
    pub imprint: String,
    #[validate(custom(function = "crate::validation::book_status", message = "Invalid status"))]
    pub status: Option<String>,
    #[validate(custom(function = "crate::validation::iso8601", message = "Invalid date"))]
    pub due_back: Option<String>,
}

impl BookInstanceInput {
    const FIELDS: [&'static str; 4] = ["book", "imprint", "status", "due_back"];

    pub fn errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e, &Self::FIELDS),
        }
    }

    /// Build the record with the imprint escaped, falling back to the
    /// defaults for a missing or unparseable status (Maintenance) and due
    /// date (now).
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book: parse_id(&self.book).unwrap_or_else(Uuid::nil),
            imprint: sanitize(&self.imprint),
            status: self
                .status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            due_back: self
                .due_back
                .as_deref()
                .and_then(parse_iso8601)
                .unwrap_or_else(Utc::now),
        }
    }
}

impl From<BookInstanceForm> for BookInstanceInput {
    fn from(form: BookInstanceForm) -> Self {
        Self {
            book: form.book.trim().to_string(),
            imprint: form.imprint.trim().to_string(),
            status: trim_optional(form.status.as_deref()),
            due_back: trim_optional(form.due_back.as_deref()),
        }
    }
}
