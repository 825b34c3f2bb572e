//! Book instance (copy) management service

use std::collections::HashMap;

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInstance, BookInstanceForm, BookInstanceInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies with their book, ordered by book title. Copies whose book
    /// no longer exists come last.
    pub async fn list(&self) -> AppResult<Vec<(BookInstance, Option<Book>)>> {
        let (instances, books) = tokio::try_join!(
            self.repository.book_instances.list(),
            self.repository.books.list(),
        )?;
        let books: HashMap<Uuid, Book> = books.into_iter().map(|b| (b.id, b)).collect();

        let mut out: Vec<_> = instances
            .into_iter()
            .map(|instance| {
                let book = books.get(&instance.book).cloned();
                (instance, book)
            })
            .collect();
        out.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(a), Some(b)) => a.title.cmp(&b.title),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(out)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository
            .book_instances
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Copy with the book it belongs to, when that book exists
    pub async fn get_with_book(&self, id: Uuid) -> AppResult<(BookInstance, Option<Book>)> {
        let instance = self.get(id).await?;
        let book = self.repository.books.find_by_id(instance.book).await?;
        Ok((instance, book))
    }

    /// Books a copy can be attached to, by title
    pub async fn book_options(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn create(&self, form: BookInstanceForm) -> AppResult<Submission<BookInstance>> {
        let input = BookInstanceInput::from(form);
        let errors = input.errors();
        let instance = input.into_instance(Uuid::new_v4());
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: instance, errors });
        }

        self.repository.book_instances.insert(&instance).await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
        Ok(Submission::Saved(instance))
    }

    pub async fn update(&self, id: Uuid, form: BookInstanceForm) -> AppResult<Submission<BookInstance>> {
        let input = BookInstanceInput::from(form);
        let errors = input.errors();
        let instance = input.into_instance(id);
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: instance, errors });
        }

        if !self.repository.book_instances.update(&instance).await? {
            return Err(AppError::NotFound("Book copy not found".to_string()));
        }
        tracing::info!("Updated book instance {}", id);
        Ok(Submission::Saved(instance))
    }

    /// Delete a copy if it exists
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repository.book_instances.find_by_id(id).await?.is_some() {
            self.repository.book_instances.delete(id).await?;
            tracing::info!("Deleted book instance {}", id);
        }
        Ok(())
    }
}
