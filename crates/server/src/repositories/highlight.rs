use sqlx::SqlitePool;

use crate::models::Slide;

/// Singleton document holding the carousel slides
pub struct HighlightRepository;

impl HighlightRepository {
    /// Get the stored slides, or `None` if nothing has been saved yet
    pub async fn get(db: &SqlitePool) -> Result<Option<Vec<Slide>>, sqlx::Error> {
        let result: Option<(String,)> = sqlx::query_as("SELECT slides FROM destaques WHERE id = 1")
            .fetch_optional(db)
            .await?;

        match result {
            Some((data,)) => {
                let slides: Vec<Slide> =
                    serde_json::from_str(&data).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
                Ok(Some(slides))
            }
            None => Ok(None),
        }
    }

    /// Replace the whole slide sequence in a single upsert
    pub async fn replace(db: &SqlitePool, slides: &[Slide]) -> Result<(), sqlx::Error> {
        let json = serde_json::to_string(slides).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        sqlx::query(
            r#"
            INSERT INTO destaques (id, slides) VALUES (1, $1)
            ON CONFLICT(id) DO UPDATE SET
                slides = excluded.slides,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            "#,
        )
        .bind(json)
        .execute(db)
        .await?;

        Ok(())
    }
}
