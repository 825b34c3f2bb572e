//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{field_errors, parse_iso8601, sanitize, trim_optional, FieldError, ALPHANUMERIC};

/// Medium date, e.g. `Oct 18, 2026`
pub const DATE_MED: &str = "%b %-d, %Y";

/// Full author record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn url(&self) -> String {
        format!("/catalog/authors/{}", self.id)
    }

    /// Display name, `"family_name, first_name"`
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// `"<birth> - <death>"`, or nothing when the birth date is unknown
    pub fn life_span(&self) -> String {
        let Some(birth) = self.date_of_birth else {
            return String::new();
        };
        let death = self
            .date_of_death
            .map(|d| d.format(DATE_MED).to_string())
            .unwrap_or_default();
        format!("{} - {}", birth.format(DATE_MED), death)
    }

    pub fn view(&self) -> AuthorView {
        AuthorView {
            id: self.id,
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
            name: self.name(),
            life_span: self.life_span(),
            url: self.url(),
            date_of_birth_yyyy_mm_dd: self.date_of_birth.map(|d| d.to_string()),
            date_of_death_yyyy_mm_dd: self.date_of_death.map(|d| d.to_string()),
        }
    }
}

/// Author with its derived display fields, as handed to templates
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub name: String,
    pub life_span: String,
    pub url: String,
    pub date_of_birth_yyyy_mm_dd: Option<String>,
    pub date_of_death_yyyy_mm_dd: Option<String>,
}

/// Raw author form submission
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
}

/// Sanitized author fields, checked before anything is written
#[derive(Debug, Clone, Validate)]
pub struct AuthorInput {
    #[validate(
        length(min = 3, max = 100, message = "First name must be specified."),
        regex(path = *ALPHANUMERIC, message = "First name has non-alphanumeric characters.")
    )]
    pub first_name: String,
    #[validate(
        length(min = 3, max = 100, message = "Family name must be specified."),
        regex(path = *ALPHANUMERIC, message = "Family name has non-alphanumeric characters.")
    )]
    pub family_name: String,
    #[validate(custom(function = "crate::validation::iso8601", message = "Invalid date of birth"))]
    pub date_of_birth: Option<String>,
    #[validate(custom(function = "crate::validation::iso8601", message = "Invalid date of death"))]
    pub date_of_death: Option<String>,
}

impl AuthorInput {
    const FIELDS: [&'static str; 4] = ["first_name", "family_name", "date_of_birth", "date_of_death"];

    pub fn errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e, &Self::FIELDS),
        }
    }

    /// Build the record with names escaped; dates that do not parse are left empty
    pub fn into_author(self, id: Uuid) -> Author {
        let date = |v: Option<String>| v.as_deref().and_then(parse_iso8601).map(|d| d.date_naive());
        Author {
            id,
            first_name: sanitize(&self.first_name),
            family_name: sanitize(&self.family_name),
            date_of_birth: date(self.date_of_birth),
            date_of_death: date(self.date_of_death),
        }
    }
}

impl From<AuthorForm> for AuthorInput {
    fn from(form: AuthorForm) -> Self {
        Self {
            first_name: form.first_name.trim().to_string(),
            family_name: form.family_name.trim().to_string(),
            date_of_birth: trim_optional(form.date_of_birth.as_deref()),
            date_of_death: trim_optional(form.date_of_death.as_deref()),
        }
    }
}
