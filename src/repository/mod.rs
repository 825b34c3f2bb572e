//! Repository layer: one store per collection, PostgreSQL or in-memory

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, Genre},
};

/// `update` and `delete` return whether a record with that id existed.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn insert(&self, author: &Author) -> AppResult<()>;
    async fn update(&self, author: &Author) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;
    /// Genres among `ids` that exist, ordered by name
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;
    /// Genre whose name has the given collation key
    async fn find_by_name_key(&self, key: &str) -> AppResult<Option<Genre>>;
    async fn insert(&self, genre: &Genre) -> AppResult<()>;
    async fn update(&self, genre: &Genre) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by title
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
    /// Books whose `author` is `author_id`, ordered by title
    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    /// Books whose `genre` list contains `genre_id`, ordered by title
    async fn find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    async fn insert(&self, book: &Book) -> AppResult<()>;
    async fn update(&self, book: &Book) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BookInstance>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn find_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn insert(&self, instance: &BookInstance) -> AppResult<()>;
    async fn update(&self, instance: &BookInstance) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Main repository struct holding one store per collection
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool)),
        }
    }

    /// Create an empty repository that lives in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            authors: store.clone(),
            genres: store.clone(),
            books: store.clone(),
            book_instances: store,
        }
    }
}
