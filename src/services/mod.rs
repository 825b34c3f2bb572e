//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use crate::{models::Book, repository::Repository, validation::FieldError};

/// Result of handling a create or update form
#[derive(Debug)]
pub enum Submission<T> {
    /// Validated and written
    Saved(T),
    /// An equivalent record already existed; nothing was written
    Existing(T),
    /// Validation failed; `entity` is rebuilt from the submitted fields
    Rejected { entity: T, errors: Vec<FieldError> },
}

/// Result of a guarded delete
#[derive(Debug)]
pub enum Removal<T> {
    /// Removed, or there was nothing to remove
    Deleted,
    /// Books still reference the record; nothing was removed
    Blocked { entity: T, dependents: Vec<Book> },
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository),
        }
    }
}
