use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{match_key, NewSong, Song, SongPatch};

/// Common SELECT fields for song queries
const SELECT_SONG: &str = r#"
    SELECT
        id, created_at, updated_at,
        titulo, artista, tempo, momento, tom,
        download_url, letra_url, cifra_url, image_url, preview_url
    FROM musicas
"#;

/// Optional filters shared by listing and counting.
/// A `None` field matches every song.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1 IS NULL OR tempo_key = $1)
      AND ($2 IS NULL OR momento_key = $2)
"#;

/// Category/moment filter, matched case-insensitively on the whole string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub category: Option<String>,
    pub moment: Option<String>,
}

impl SongFilter {
    pub fn new(category: Option<&str>, moment: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            moment: moment.map(str::to_string),
        }
    }

    fn keys(&self) -> (Option<String>, Option<String>) {
        (
            self.category.as_deref().map(match_key),
            self.moment.as_deref().map(match_key),
        )
    }
}

/// Offset/limit applied in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

/// Persistence capabilities needed by the song services
#[async_trait]
pub trait SongStore: Send + Sync {
    async fn create(&self, data: NewSong) -> Result<Song, sqlx::Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, sqlx::Error>;

    /// Matching songs sorted by title, optionally windowed
    async fn find_many(
        &self,
        filter: &SongFilter,
        window: Option<Window>,
    ) -> Result<Vec<Song>, sqlx::Error>;

    async fn count_matching(&self, filter: &SongFilter) -> Result<i64, sqlx::Error>;

    /// Returns `None` if no song has this id
    async fn update_by_id(&self, id: i64, patch: SongPatch) -> Result<Option<Song>, sqlx::Error>;

    async fn delete_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;

    /// Distinct moment spellings used within a category
    async fn distinct_moments(&self, category: &str) -> Result<Vec<String>, sqlx::Error>;

    async fn distinct_categories(&self) -> Result<Vec<String>, sqlx::Error>;
}

/// SQLite-backed song store
#[derive(Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn create(&self, data: NewSong) -> Result<Song, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO musicas (
                titulo, artista, tempo, momento, tom,
                download_url, letra_url, cifra_url, image_url, preview_url,
                tempo_key, momento_key
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.artist)
        .bind(&data.category)
        .bind(&data.moment)
        .bind(&data.key)
        .bind(&data.download_url)
        .bind(&data.lyrics_url)
        .bind(&data.chords_url)
        .bind(&data.image_url)
        .bind(&data.preview_url)
        .bind(match_key(&data.category))
        .bind(data.moment.as_deref().map(match_key))
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_SONG);
        let row = sqlx::query_as::<_, SongRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_many(
        &self,
        filter: &SongFilter,
        window: Option<Window>,
    ) -> Result<Vec<Song>, sqlx::Error> {
        let (category_key, moment_key) = filter.keys();
        // LIMIT -1 means no limit in SQLite
        let (offset, limit) = window.map_or((0, -1), |w| (w.offset, w.limit));

        let query = format!(
            "{} {} ORDER BY titulo COLLATE NOCASE, id LIMIT $3 OFFSET $4",
            SELECT_SONG, FILTER_CLAUSE
        );
        let rows = sqlx::query_as::<_, SongRow>(&query)
            .bind(category_key)
            .bind(moment_key)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_matching(&self, filter: &SongFilter) -> Result<i64, sqlx::Error> {
        let (category_key, moment_key) = filter.keys();
        let query = format!("SELECT COUNT(*) FROM musicas {}", FILTER_CLAUSE);
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(category_key)
            .bind(moment_key)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_by_id(&self, id: i64, patch: SongPatch) -> Result<Option<Song>, sqlx::Error> {
        let category_key = patch.category.as_deref().map(match_key);
        let (artist_set, artist) = patch.artist.into_assignment();
        let (moment_set, moment) = patch.moment.into_assignment();
        let moment_key = moment.as_deref().map(match_key);
        let (key_set, key) = patch.key.into_assignment();
        let (download_set, download_url) = patch.download_url.into_assignment();
        let (lyrics_set, lyrics_url) = patch.lyrics_url.into_assignment();
        let (chords_set, chords_url) = patch.chords_url.into_assignment();
        let (image_set, image_url) = patch.image_url.into_assignment();
        let (preview_set, preview_url) = patch.preview_url.into_assignment();

        // Single statement: columns absent from the patch are never rewritten
        let row = sqlx::query_as::<_, SongRow>(
            r#"
            UPDATE musicas SET
                titulo = COALESCE($1, titulo),
                tempo = COALESCE($2, tempo),
                tempo_key = COALESCE($3, tempo_key),
                artista = CASE WHEN $4 THEN $5 ELSE artista END,
                momento = CASE WHEN $6 THEN $7 ELSE momento END,
                momento_key = CASE WHEN $6 THEN $8 ELSE momento_key END,
                tom = CASE WHEN $9 THEN $10 ELSE tom END,
                download_url = CASE WHEN $11 THEN $12 ELSE download_url END,
                letra_url = CASE WHEN $13 THEN $14 ELSE letra_url END,
                cifra_url = CASE WHEN $15 THEN $16 ELSE cifra_url END,
                image_url = CASE WHEN $17 THEN $18 ELSE image_url END,
                preview_url = CASE WHEN $19 THEN $20 ELSE preview_url END,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
            WHERE id = $21
            RETURNING
                id, created_at, updated_at,
                titulo, artista, tempo, momento, tom,
                download_url, letra_url, cifra_url, image_url, preview_url
            "#,
        )
        .bind(patch.title)
        .bind(patch.category)
        .bind(category_key)
        .bind(artist_set)
        .bind(artist)
        .bind(moment_set)
        .bind(moment)
        .bind(moment_key)
        .bind(key_set)
        .bind(key)
        .bind(download_set)
        .bind(download_url)
        .bind(lyrics_set)
        .bind(lyrics_url)
        .bind(chords_set)
        .bind(chords_url)
        .bind(image_set)
        .bind(image_url)
        .bind(preview_set)
        .bind(preview_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM musicas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn distinct_moments(&self, category: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT MIN(momento) FROM musicas
            WHERE tempo_key = $1 AND momento_key IS NOT NULL
            GROUP BY momento_key
            ORDER BY momento_key
            "#,
        )
        .bind(match_key(category))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(m,)| m).collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT MIN(tempo) FROM musicas GROUP BY tempo_key ORDER BY tempo_key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct SongRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    titulo: String,
    artista: Option<String>,
    tempo: String,
    momento: Option<String>,
    tom: Option<String>,
    download_url: Option<String>,
    letra_url: Option<String>,
    cifra_url: Option<String>,
    image_url: Option<String>,
    preview_url: Option<String>,
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Self {
            id: row.id,
            title: row.titulo,
            artist: row.artista,
            category: row.tempo,
            moment: row.momento,
            key: row.tom,
            download_url: row.download_url,
            lyrics_url: row.letra_url,
            chords_url: row.cifra_url,
            image_url: row.image_url,
            preview_url: row.preview_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
