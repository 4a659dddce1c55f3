use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::{AdminSession, ApiJson, ApiPath, ApiQuery};
use crate::error::{AppResult, ErrorResponse};
use crate::models::{CreateSong, Song, SongListing, UpdateSong};
use crate::repositories::SongFilter;
use crate::services::PageRequest;
use crate::state::AppState;

/// Query parameters for the public song listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSongsQuery {
    /// Liturgical category, matched case-insensitively
    pub tempo: Option<String>,
    /// Moment within the celebration, matched case-insensitively
    pub momento: Option<String>,
    /// Page number (1-based); enables pagination
    pub page: Option<i64>,
    /// Page size (1..=100); enables pagination
    pub limit: Option<i64>,
}

/// Simple confirmation message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// List songs by category and moment
///
/// Returns a plain array, or a page envelope when `page` or `limit` is given.
#[utoipa::path(
    get,
    path = "/api/musicas",
    tag = "musicas",
    params(ListSongsQuery),
    responses(
        (status = 200, description = "Matching songs", body = SongListing),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListSongsQuery>,
) -> AppResult<Json<SongListing>> {
    let page = PageRequest::from_query(query.page, query.limit)?;
    let filter = SongFilter {
        category: non_blank(query.tempo),
        moment: non_blank(query.momento),
    };
    let listing = state.songs.list(filter, page).await?;
    Ok(Json(listing))
}

/// List every song, sorted by title
#[utoipa::path(
    get,
    path = "/api/musicas/all",
    tag = "musicas",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All songs", body = Vec<Song>),
        (status = 401, description = "Missing session token", body = ErrorResponse),
        (status = 403, description = "Invalid session token", body = ErrorResponse)
    )
)]
pub async fn list_all_songs(
    _session: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Song>>> {
    let songs = state.songs.list_all().await?;
    Ok(Json(songs))
}

/// Get a song by ID
#[utoipa::path(
    get,
    path = "/api/musicas/{id}",
    tag = "musicas",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Song ID")
    ),
    responses(
        (status = 200, description = "Song", body = Song),
        (status = 404, description = "Song not found", body = ErrorResponse)
    )
)]
pub async fn get_song(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Song>> {
    let song = state.songs.get(id).await?;
    Ok(Json(song))
}

/// Create a song
#[utoipa::path(
    post,
    path = "/api/musicas",
    tag = "musicas",
    security(("bearer" = [])),
    request_body = CreateSong,
    responses(
        (status = 201, description = "Song created", body = Song),
        (status = 400, description = "Missing title or category", body = ErrorResponse),
        (status = 401, description = "Missing session token", body = ErrorResponse)
    )
)]
pub async fn create_song(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSong>,
) -> AppResult<(StatusCode, Json<Song>)> {
    let song = state.songs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

/// Partially update a song
///
/// Absent fields are kept, `null` clears optional fields.
#[utoipa::path(
    put,
    path = "/api/musicas/{id}",
    tag = "musicas",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Song ID")
    ),
    request_body = UpdateSong,
    responses(
        (status = 200, description = "Song updated", body = Song),
        (status = 400, description = "Invalid field values", body = ErrorResponse),
        (status = 404, description = "Song not found", body = ErrorResponse)
    )
)]
pub async fn update_song(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateSong>,
) -> AppResult<Json<Song>> {
    let song = state.songs.update(id, payload).await?;
    Ok(Json(song))
}

/// Delete a song
#[utoipa::path(
    delete,
    path = "/api/musicas/{id}",
    tag = "musicas",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Song ID")
    ),
    responses(
        (status = 200, description = "Song deleted", body = MessageResponse),
        (status = 404, description = "Song not found", body = ErrorResponse)
    )
)]
pub async fn delete_song(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.songs.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Música excluída com sucesso.".to_string(),
    }))
}
