//! In-process store with the same semantics as the PostgreSQL repositories

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreStore};
use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, Genre},
};

/// Collections kept in insertion order
#[derive(Default)]
pub struct MemoryStore {
    authors: RwLock<IndexMap<Uuid, Author>>,
    genres: RwLock<IndexMap<Uuid, Genre>>,
    books: RwLock<IndexMap<Uuid, Book>>,
    book_instances: RwLock<IndexMap<Uuid, BookInstance>>,
}

fn sorted_by<T: Clone, K: Ord>(
    values: impl Iterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut out: Vec<T> = values.collect();
    out.sort_by_key(|v| key(v));
    out
}

/// Replace the record under `id` if present
fn replace<T: Clone>(map: &mut IndexMap<Uuid, T>, id: Uuid, value: &T) -> bool {
    match map.get_mut(&id) {
        Some(slot) => {
            *slot = value.clone();
            true
        }
        None => false,
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = self.authors.read().await;
        Ok(sorted_by(authors.values().cloned(), |a| a.family_name.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn insert(&self, author: &Author) -> AppResult<()> {
        self.authors.write().await.insert(author.id, author.clone());
        Ok(())
    }

    async fn update(&self, author: &Author) -> AppResult<bool> {
        Ok(replace(&mut *self.authors.write().await, author.id, author))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.authors.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = self.genres.read().await;
        Ok(sorted_by(genres.values().cloned(), |g| g.name.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.genres.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let genres = self.genres.read().await;
        let found = genres.values().filter(|g| ids.contains(&g.id)).cloned();
        Ok(sorted_by(found, |g| g.name.clone()))
    }

    async fn find_by_name_key(&self, key: &str) -> AppResult<Option<Genre>> {
        let genres = self.genres.read().await;
        Ok(genres.values().find(|g| g.name_key() == key).cloned())
    }

    async fn insert(&self, genre: &Genre) -> AppResult<()> {
        self.genres.write().await.insert(genre.id, genre.clone());
        Ok(())
    }

    async fn update(&self, genre: &Genre) -> AppResult<bool> {
        Ok(replace(&mut *self.genres.write().await, genre.id, genre))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.genres.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(sorted_by(books.values().cloned(), |b| b.title.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        let found = books.values().filter(|b| b.author == author_id).cloned();
        Ok(sorted_by(found, |b| b.title.clone()))
    }

    async fn find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        let found = books.values().filter(|b| b.genre.contains(&genre_id)).cloned();
        Ok(sorted_by(found, |b| b.title.clone()))
    }

    async fn insert(&self, book: &Book) -> AppResult<()> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        Ok(replace(&mut *self.books.write().await, book.id, book))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.books.write().await.shift_remove(&id).is_some())
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        Ok(self.book_instances.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.book_instances.read().await.get(&id).cloned())
    }

    async fn find_by_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        let instances = self.book_instances.read().await;
        let found = instances.values().filter(|i| i.book == book_id).cloned();
        Ok(sorted_by(found, |i| i.due_back))
    }

    async fn insert(&self, instance: &BookInstance) -> AppResult<()> {
        self.book_instances.write().await.insert(instance.id, instance.clone());
        Ok(())
    }

    async fn update(&self, instance: &BookInstance) -> AppResult<bool> {
        Ok(replace(&mut *self.book_instances.write().await, instance.id, instance))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.book_instances.write().await.shift_remove(&id).is_some())
    }
}
