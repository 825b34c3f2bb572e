//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorForm, AuthorInput, AuthorView};
pub use book::{Book, BookForm, BookInput, BookView};
pub use book_instance::{BookInstance, BookInstanceForm, BookInstanceInput, BookInstanceView, BookRef, BookStatus};
pub use genre::{Genre, GenreForm, GenreInput, GenreView};
