//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{collation_key, field_errors, sanitize, FieldError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genres/{}", self.id)
    }

    /// Key used to detect names that differ only by case or accents
    pub fn name_key(&self) -> String {
        collation_key(&self.name)
    }

    pub fn view(&self) -> GenreView {
        GenreView {
            id: self.id,
            name: self.name.clone(),
            url: self.url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

/// Raw genre form submission
#[derive(Debug, Default, Deserialize)]
pub struct GenreForm {
    #[serde(default)]
    pub name: String,
}

/// Trimmed genre fields. Rules apply to the text as typed; markup is escaped
/// only when the record is built.
#[derive(Debug, Clone, Validate)]
pub struct GenreInput {
    #[validate(length(min = 3, max = 100, message = "Genre name must contain at least 3 characters"))]
    pub name: String,
}

impl GenreInput {
    pub fn errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e, &["name"]),
        }
    }

    pub fn into_genre(self, id: Uuid) -> Genre {
        Genre {
            id,
            name: sanitize(&self.name),
        }
    }
}

impl From<GenreForm> for GenreInput {
    fn from(form: GenreForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
        }
    }
}
