use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::{parse_slides, Slide, ValidationError};
use crate::repositories::HighlightRepository;

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Carousel ("destaques") configuration
pub struct HighlightService {
    db: SqlitePool,
}

impl HighlightService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Current slides; empty if nothing was ever saved. Never writes.
    pub async fn get(&self) -> Result<Vec<Slide>, HighlightError> {
        Ok(HighlightRepository::get(&self.db)
            .await?
            .unwrap_or_default())
    }

    /// Validate and atomically replace the whole slide sequence
    pub async fn replace(&self, payload: Value) -> Result<Vec<Slide>, HighlightError> {
        let slides = parse_slides(payload)?;
        HighlightRepository::replace(&self.db, &slides).await?;
        tracing::info!("Saved {} highlight slides", slides.len());
        Ok(slides)
    }
}
