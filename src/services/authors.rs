//! Author management service

use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, AuthorInput, Book},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors, by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Author with the books that reference it
    pub async fn get_with_books(&self, id: Uuid) -> AppResult<(Author, Vec<Book>)> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_by_author(id),
        )?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok((author, books))
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<Submission<Author>> {
        let input = AuthorInput::from(form);
        let errors = input.errors();
        let author = input.into_author(Uuid::new_v4());
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: author, errors });
        }

        self.repository.authors.insert(&author).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(Submission::Saved(author))
    }

    /// Replace every field of an existing author
    pub async fn update(&self, id: Uuid, form: AuthorForm) -> AppResult<Submission<Author>> {
        let input = AuthorInput::from(form);
        let errors = input.errors();
        let author = input.into_author(id);
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: author, errors });
        }

        if !self.repository.authors.update(&author).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        tracing::info!("Updated author {}", id);
        Ok(Submission::Saved(author))
    }

    /// Delete an author unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal<Author>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_by_author(id),
        )?;

        let Some(author) = author else {
            tracing::debug!("Author {} already gone, nothing to delete", id);
            return Ok(Removal::Deleted);
        };

        if !books.is_empty() {
            tracing::info!("Refused to delete author {}: {} dependent book(s)", id, books.len());
            return Ok(Removal::Blocked { entity: author, dependents: books });
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(Removal::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form(first: &str, family: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.into(),
            family_name: family.into(),
            date_of_birth: Some("1892-01-03".into()),
            date_of_death: None,
        }
    }

    async fn book_by(repository: &Repository, author: Uuid, title: &str) {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.into(),
            author,
            summary: "summary".into(),
            isbn: "isbn".into(),
            genre: vec![],
        };
        repository.books.insert(&book).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let service = AuthorsService::new(Repository::in_memory());
        let Submission::Saved(created) = service.create(form("John", "Tolkien")).await.unwrap() else {
            panic!("expected the author to be saved");
        };

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1892, 1, 3));
    }

    #[tokio::test]
    async fn test_invalid_author_is_not_persisted() {
        let service = AuthorsService::new(Repository::in_memory());
        let outcome = service.create(form("Jo", "Tolkien")).await.unwrap();
        match outcome {
            Submission::Rejected { entity, errors } => {
                assert_eq!(entity.first_name, "Jo");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_author_is_not_found() {
        let service = AuthorsService::new(Repository::in_memory());
        let err = service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.update(Uuid::new_v4(), form("John", "Tolkien")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let service = AuthorsService::new(Repository::in_memory());
        let Submission::Saved(created) = service.create(form("John", "Tolkien")).await.unwrap() else {
            panic!("expected the author to be saved");
        };

        let replacement = AuthorForm {
            first_name: "Ronald".into(),
            family_name: "Tolkien".into(),
            date_of_birth: None,
            date_of_death: None,
        };
        service.update(created.id, replacement).await.unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.first_name, "Ronald");
        assert_eq!(fetched.date_of_birth, None);
    }

    #[tokio::test]
    async fn test_delete_guard() {
        let repository = Repository::in_memory();
        let service = AuthorsService::new(repository.clone());
        let Submission::Saved(author) = service.create(form("John", "Tolkien")).await.unwrap() else {
            panic!("expected the author to be saved");
        };
        book_by(&repository, author.id, "The Hobbit").await;
        book_by(&repository, author.id, "The Silmarillion").await;

        match service.delete(author.id).await.unwrap() {
            Removal::Blocked { entity, dependents } => {
                assert_eq!(entity.id, author.id);
                assert_eq!(dependents.len(), 2);
            }
            Removal::Deleted => panic!("author with books must not be deleted"),
        }
        assert!(service.get(author.id).await.is_ok());

        for book in repository.books.find_by_author(author.id).await.unwrap() {
            repository.books.delete(book.id).await.unwrap();
        }
        assert!(matches!(service.delete(author.id).await.unwrap(), Removal::Deleted));
        assert!(service.get(author.id).await.is_err());

        // Deleting again is a no-op
        assert!(matches!(service.delete(author.id).await.unwrap(), Removal::Deleted));
    }
}
