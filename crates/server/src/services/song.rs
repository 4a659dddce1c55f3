use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    canonical_position, match_key, CreateSong, Song, SongListing, SongPage, UpdateSong,
    ValidationError,
};
use crate::repositories::{SongFilter, SongStore, Window};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Error)]
pub enum SongError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Música {0} não encontrada.")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Validated page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build a page request from optional query values.
    /// Returns `None` when neither value was supplied (no pagination).
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Option<Self>, ValidationError> {
        if page.is_none() && limit.is_none() {
            return Ok(None);
        }

        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(ValidationError::new(
                "O parâmetro \"page\" deve ser maior ou igual a 1.",
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ValidationError::new(format!(
                "O parâmetro \"limit\" deve estar entre 1 e {}.",
                MAX_PAGE_SIZE
            )));
        }

        Ok(Some(Self { page, limit }))
    }

    fn window(&self) -> Window {
        Window {
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }

    fn total_pages(&self, total_items: i64) -> i64 {
        (total_items + self.limit - 1) / self.limit
    }
}

/// CRUD and lookup operations over the song catalogue
pub struct SongService {
    store: Arc<dyn SongStore>,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }

    /// Every song, sorted by title
    pub async fn list_all(&self) -> Result<Vec<Song>, SongError> {
        Ok(self.store.find_many(&SongFilter::default(), None).await?)
    }

    /// Songs matching the filter, optionally paginated
    pub async fn list(
        &self,
        filter: SongFilter,
        page: Option<PageRequest>,
    ) -> Result<SongListing, SongError> {
        let Some(page) = page else {
            let songs = self.store.find_many(&filter, None).await?;
            tracing::debug!("Found {} songs for {:?}", songs.len(), filter);
            return Ok(SongListing::All(songs));
        };

        let total_items = self.store.count_matching(&filter).await?;
        let items = self.store.find_many(&filter, Some(page.window())).await?;

        Ok(SongListing::Page(SongPage {
            items,
            total_items,
            total_pages: page.total_pages(total_items),
            current_page: page.page,
        }))
    }

    pub async fn get(&self, id: i64) -> Result<Song, SongError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(SongError::NotFound(id))
    }

    pub async fn create(&self, data: CreateSong) -> Result<Song, SongError> {
        let data = data.validate()?;
        let song = self.store.create(data).await?;
        tracing::info!("Created song {} \"{}\"", song.id, song.title);
        Ok(song)
    }

    pub async fn update(&self, id: i64, data: UpdateSong) -> Result<Song, SongError> {
        let patch = data.validate()?;
        let song = self
            .store
            .update_by_id(id, patch)
            .await?
            .ok_or(SongError::NotFound(id))?;
        tracing::info!("Updated song {} \"{}\"", song.id, song.title);
        Ok(song)
    }

    pub async fn delete(&self, id: i64) -> Result<(), SongError> {
        if !self.store.delete_by_id(id).await? {
            return Err(SongError::NotFound(id));
        }
        tracing::info!("Deleted song {}", id);
        Ok(())
    }

    /// Distinct moments used in a category.
    /// Canonical moments come first in Mass order, the rest alphabetically.
    pub async fn moments(&self, category: &str) -> Result<Vec<String>, SongError> {
        let category = required_category(category)?;
        let mut moments = self.store.distinct_moments(category).await?;
        moments.sort_by_cached_key(|m| (canonical_position(m).unwrap_or(usize::MAX), match_key(m)));
        Ok(moments)
    }

    /// Distinct categories, alphabetically
    pub async fn categories(&self) -> Result<Vec<String>, SongError> {
        Ok(self.store.distinct_categories().await?)
    }
}

/// Trimmed, non-empty category parameter
pub(crate) fn required_category(category: &str) -> Result<&str, ValidationError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::new(
            "O parâmetro \"tempo\" é obrigatório.",
        ));
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::repositories::SqliteSongStore;

    async fn service() -> SongService {
        let pool = create_memory_pool().await.unwrap();
        SongService::new(Arc::new(SqliteSongStore::new(pool)))
    }

    fn create(title: &str, category: &str, moment: &str) -> CreateSong {
        CreateSong {
            title: Some(title.to_string()),
            category: Some(category.to_string()),
            moment: Some(moment.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_request_defaults_and_bounds() {
        assert_eq!(PageRequest::from_query(None, None).unwrap(), None);
        assert_eq!(
            PageRequest::from_query(Some(2), None).unwrap(),
            Some(PageRequest { page: 2, limit: DEFAULT_PAGE_SIZE })
        );
        assert!(PageRequest::from_query(Some(0), None).is_err());
        assert!(PageRequest::from_query(None, Some(0)).is_err());
        assert!(PageRequest::from_query(None, Some(MAX_PAGE_SIZE + 1)).is_err());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest { page: 1, limit: 2 };
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(4), 2);
        assert_eq!(page.total_pages(5), 3);
    }

    #[tokio::test]
    async fn test_paginated_listing() {
        let service = service().await;
        for title in ["A", "B", "C", "D", "E"] {
            service.create(create(title, "Advento", "Entrada")).await.unwrap();
        }

        let filter = SongFilter::new(Some("advento"), Some("entrada"));
        let listing = service
            .list(filter, Some(PageRequest { page: 3, limit: 2 }))
            .await
            .unwrap();

        let SongListing::Page(page) = listing else {
            panic!("expected a page");
        };
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "E");
    }

    #[tokio::test]
    async fn test_not_found_paths() {
        let service = service().await;

        assert!(matches!(service.get(42).await, Err(SongError::NotFound(42))));
        assert!(matches!(service.delete(42).await, Err(SongError::NotFound(42))));
        assert!(matches!(
            service.update(42, UpdateSong::default()).await,
            Err(SongError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let service = service().await;
        let result = service
            .create(CreateSong {
                title: Some("Sem tempo".to_string()),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(SongError::Validation(_))));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_moments_in_mass_order() {
        let service = service().await;
        for moment in ["Final", "Louvor", "Entrada", "comunhão", "Adoração"] {
            service.create(create(moment, "Páscoa", moment)).await.unwrap();
        }

        let moments = service.moments("páscoa").await.unwrap();
        assert_eq!(
            moments,
            vec!["Entrada", "comunhão", "Final", "Adoração", "Louvor"]
        );

        assert!(matches!(
            service.moments("  ").await,
            Err(SongError::Validation(_))
        ));
    }
}
