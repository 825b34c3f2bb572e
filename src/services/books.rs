//! Book management service

use std::collections::HashMap;

use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookForm, BookInput, BookInstance, Genre},
    repository::Repository,
};

/// A book with its references resolved. Broken references stay `None` or
/// are absent from `genres`; the book itself is untouched.
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books by title, each with its author when that author exists
    pub async fn list(&self) -> AppResult<Vec<(Book, Option<Author>)>> {
        let (books, authors) = tokio::try_join!(
            self.repository.books.list(),
            self.repository.authors.list(),
        )?;
        let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author).cloned();
                (book, author)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, instances) = tokio::try_join!(
            self.get(id),
            self.repository.book_instances.find_by_book(id),
        )?;
        let (author, genres) = tokio::try_join!(
            self.repository.authors.find_by_id(book.author),
            self.repository.genres.find_many(&book.genre),
        )?;
        Ok(BookDetail { book, author, genres, instances })
    }

    /// Everything the book form offers to choose from
    pub async fn form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors.list(), self.repository.genres.list())
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Submission<Book>> {
        let input = BookInput::from(form);
        let errors = input.errors();
        let book = input.into_book(Uuid::new_v4());
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: book, errors });
        }

        self.repository.books.insert(&book).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(Submission::Saved(book))
    }

    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<Submission<Book>> {
        let input = BookInput::from(form);
        let errors = input.errors();
        let book = input.into_book(id);
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: book, errors });
        }

        if !self.repository.books.update(&book).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tracing::info!("Updated book {}", id);
        Ok(Submission::Saved(book))
    }

    /// Book with its copies, shown before deleting
    pub async fn get_with_instances(&self, id: Uuid) -> AppResult<(Book, Vec<BookInstance>)> {
        tokio::try_join!(self.get(id), self.repository.book_instances.find_by_book(id))
    }

    /// Delete a book. Books are not guarded: their copies keep a dangling
    /// reference and render without a title.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repository.books.find_by_id(id).await?.is_some() {
            self.repository.books.delete(id).await?;
            tracing::info!("Deleted book {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookStatus;
    use chrono::Utc;

    async fn author(repository: &Repository, family_name: &str) -> Author {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Some".into(),
            family_name: family_name.into(),
            date_of_birth: None,
            date_of_death: None,
        };
        repository.authors.insert(&author).await.unwrap();
        author
    }

    fn form(title: &str, author: Uuid, genre: Vec<Uuid>) -> BookForm {
        BookForm {
            title: title.into(),
            author: author.to_string(),
            summary: "A summary".into(),
            isbn: "9780000000000".into(),
            genre: genre.iter().map(Uuid::to_string).collect(),
        }
    }

    async fn saved(service: &BooksService, form: BookForm) -> Book {
        match service.create(form).await.unwrap() {
            Submission::Saved(book) => book,
            other => panic!("expected the book to be saved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_resolves_authors() {
        let repository = Repository::in_memory();
        let service = BooksService::new(repository.clone());
        let le_guin = author(&repository, "LeGuin").await;

        saved(&service, form("The Dispossessed", le_guin.id, vec![])).await;
        saved(&service, form("Orphan", Uuid::new_v4(), vec![])).await;

        let list = service.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].0.title, "Orphan");
        assert!(list[0].1.is_none());
        assert_eq!(list[1].1.as_ref().map(|a| a.id), Some(le_guin.id));
    }

    #[tokio::test]
    async fn test_detail_with_broken_references() {
        let repository = Repository::in_memory();
        let service = BooksService::new(repository.clone());
        let genre = Genre { id: Uuid::new_v4(), name: "Fantasy".into() };
        repository.genres.insert(&genre).await.unwrap();

        let book = saved(&service, form("Lost", Uuid::new_v4(), vec![genre.id, Uuid::new_v4()])).await;
        let copy = BookInstance {
            id: Uuid::new_v4(),
            book: book.id,
            imprint: "First edition".into(),
            status: BookStatus::Available,
            due_back: Utc::now(),
        };
        repository.book_instances.insert(&copy).await.unwrap();

        let detail = service.detail(book.id).await.unwrap();
        assert!(detail.author.is_none());
        assert_eq!(detail.book.genre.len(), 2);
        assert_eq!(detail.genres, vec![genre]);
        assert_eq!(detail.instances, vec![copy]);
    }

    #[tokio::test]
    async fn test_delete_is_unguarded() {
        let repository = Repository::in_memory();
        let service = BooksService::new(repository.clone());
        let book = saved(&service, form("Gone", Uuid::new_v4(), vec![])).await;

        service.delete(book.id).await.unwrap();
        assert!(matches!(service.get(book.id).await, Err(AppError::NotFound(_))));
        service.delete(book.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_book_not_saved() {
        let service = BooksService::new(Repository::in_memory());
        let mut invalid = form("", Uuid::new_v4(), vec![]);
        invalid.isbn.clear();
        match service.create(invalid).await.unwrap() {
            Submission::Rejected { errors, .. } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["title", "isbn"]);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }
}
