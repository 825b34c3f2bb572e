//! Local library catalog server
//!
//! Server-rendered pages for managing authors, genres, books and the
//! physical copies of those books.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub views: Arc<dyn views::Renderer>,
}

impl AppState {
    /// State over the given store, rendering with the built-in HTML renderer
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            views: Arc::new(views::HtmlRenderer),
        }
    }
}
