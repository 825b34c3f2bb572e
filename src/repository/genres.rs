//! Genres repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::GenreStore;
use crate::{error::AppResult, models::Genre};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for GenresRepository {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_name_key(&self, key: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE name_key = $1 ORDER BY name LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, genre: &Genre) -> AppResult<()> {
        sqlx::query("INSERT INTO genres (id, name, name_key) VALUES ($1, $2, $3)")
            .bind(genre.id)
            .bind(&genre.name)
            .bind(genre.name_key())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, genre: &Genre) -> AppResult<bool> {
        let result = sqlx::query("UPDATE genres SET name = $2, name_key = $3 WHERE id = $1")
            .bind(genre.id)
            .bind(&genre.name)
            .bind(genre.name_key())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{GenreForm, GenreInput};

    const SCHEMA: &str = include_str!("../../migrations/20260101000000_catalog.sql");

    fn column_type(table: &str, column: &str) -> Option<String> {
        let start = SCHEMA.find(&format!("CREATE TABLE IF NOT EXISTS {} (", table))?;
        let body = &SCHEMA[start..];
        let body = &body[..body.find(");")?];
        body.lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{} ", column)))
            .and_then(|line| line.split_whitespace().nth(1))
            .map(str::to_string)
    }

    #[test]
    fn test_longest_name_fits_its_columns() {
        // 100 typed characters that decompose to three code points each
        let input = GenreInput::from(GenreForm { name: "각".repeat(100) });
        assert!(input.errors().is_empty());
        let genre = input.into_genre(uuid::Uuid::new_v4());
        assert_eq!(genre.name_key().chars().count(), 300);

        // Any length bound on these columns would reject the genre above
        assert_eq!(column_type("genres", "name").as_deref(), Some("TEXT"));
        assert_eq!(column_type("genres", "name_key").as_deref(), Some("TEXT"));
        assert_eq!(column_type("authors", "first_name").as_deref(), Some("TEXT"));
        assert_eq!(column_type("authors", "family_name").as_deref(), Some("TEXT"));
    }
}
