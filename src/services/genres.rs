//! Genre management service

use uuid::Uuid;

use super::{Removal, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreForm, GenreInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres, by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.repository
            .genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Genre with the books filed under it
    pub async fn get_with_books(&self, id: Uuid) -> AppResult<(Genre, Vec<Book>)> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_by_genre(id),
        )?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok((genre, books))
    }

    /// Create a genre, or hand back the existing one when a genre with the
    /// same name up to case and accents is already there.
    pub async fn create(&self, form: GenreForm) -> AppResult<Submission<Genre>> {
        let input = GenreInput::from(form);
        let errors = input.errors();
        let genre = input.into_genre(Uuid::new_v4());
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: genre, errors });
        }

        if let Some(existing) = self.repository.genres.find_by_name_key(&genre.name_key()).await? {
            tracing::info!("Genre '{}' matches existing genre {}", genre.name, existing.id);
            return Ok(Submission::Existing(existing));
        }

        self.repository.genres.insert(&genre).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(Submission::Saved(genre))
    }

    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<Submission<Genre>> {
        let input = GenreInput::from(form);
        let errors = input.errors();
        let genre = input.into_genre(id);
        if !errors.is_empty() {
            return Ok(Submission::Rejected { entity: genre, errors });
        }

        if !self.repository.genres.update(&genre).await? {
            return Err(AppError::NotFound("Genre not found".to_string()));
        }
        tracing::info!("Updated genre {}", id);
        Ok(Submission::Saved(genre))
    }

    /// Delete a genre unless books are still filed under it
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal<Genre>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_by_genre(id),
        )?;

        let Some(genre) = genre else {
            tracing::debug!("Genre {} already gone, nothing to delete", id);
            return Ok(Removal::Deleted);
        };

        if !books.is_empty() {
            tracing::info!("Refused to delete genre {}: {} dependent book(s)", id, books.len());
            return Ok(Removal::Blocked { entity: genre, dependents: books });
        }

        self.repository.genres.delete(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(Removal::Deleted)
    }
}
