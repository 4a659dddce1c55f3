use futures::future::try_join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::models::{Repertoire, CANONICAL_MOMENTS};
use crate::repositories::{SongFilter, SongStore, Window};

use super::song::{required_category, SongError};

/// Builds a random repertoire: one song per canonical moment of a category
pub struct RepertoireService {
    store: Arc<dyn SongStore>,
}

impl RepertoireService {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }

    pub async fn pick(&self, category: &str) -> Result<Repertoire, SongError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.pick_with(category, &mut rng).await
    }

    /// Pick one song per moment using the given random source.
    ///
    /// For every moment the matches are counted, an offset is drawn uniformly
    /// in `[0, count)` and the single song at that offset is fetched, so the
    /// matches are never loaded in full. Moments without songs map to `None`.
    /// Any storage failure fails the whole repertoire.
    pub async fn pick_with<R: Rng + Send>(
        &self,
        category: &str,
        rng: &mut R,
    ) -> Result<Repertoire, SongError> {
        let category = required_category(category)?;
        let filters: Vec<SongFilter> = CANONICAL_MOMENTS
            .iter()
            .map(|moment| SongFilter::new(Some(category), Some(moment)))
            .collect();

        let counts = try_join_all(filters.iter().map(|f| self.store.count_matching(f))).await?;

        let offsets: Vec<Option<i64>> = counts
            .iter()
            .map(|&count| (count > 0).then(|| rng.random_range(0..count)))
            .collect();

        let picks = try_join_all(filters.iter().zip(offsets).map(|(filter, offset)| async move {
            let Some(offset) = offset else {
                return Ok(None);
            };
            let window = Window { offset, limit: 1 };
            let mut songs = self.store.find_many(filter, Some(window)).await?;
            Ok::<_, sqlx::Error>(songs.pop())
        }))
        .await?;

        tracing::debug!(
            "Built repertoire for {}: {}/{} moments filled",
            category,
            picks.iter().filter(|p| p.is_some()).count(),
            CANONICAL_MOMENTS.len()
        );

        Ok(Repertoire::new(
            CANONICAL_MOMENTS.iter().copied().zip(picks).collect(),
        ))
    }
}
