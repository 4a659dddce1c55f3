use axum::{extract::State, Json};
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::IntoParams;

use crate::api::ApiQuery;
use crate::error::{AppResult, ErrorResponse};
use crate::models::{Repertoire, Song};
use crate::state::AppState;

/// Query parameters selecting a liturgical category
#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Liturgical category (e.g. Advento), matched case-insensitively
    pub tempo: Option<String>,
}

/// Random repertoire for a liturgical category
///
/// Returns one randomly chosen song per Mass moment, keyed by moment name in
/// celebration order. Moments without songs are `null`.
#[utoipa::path(
    get,
    path = "/api/repertorio-aleatorio",
    tag = "liturgia",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Moment to song (or null)", body = HashMap<String, Option<Song>>),
        (status = 400, description = "Missing category", body = ErrorResponse)
    )
)]
pub async fn get_random_repertoire(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<Json<Repertoire>> {
    let category = query.tempo.unwrap_or_default();
    let repertoire = state.repertoire.pick(&category).await?;
    Ok(Json(repertoire))
}

/// Distinct moments used within a category
#[utoipa::path(
    get,
    path = "/api/momentos",
    tag = "liturgia",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Moments in celebration order", body = Vec<String>),
        (status = 400, description = "Missing category", body = ErrorResponse)
    )
)]
pub async fn get_moments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<Json<Vec<String>>> {
    let category = query.tempo.unwrap_or_default();
    let moments = state.songs.moments(&category).await?;
    Ok(Json(moments))
}

/// Distinct liturgical categories in the catalogue
#[utoipa::path(
    get,
    path = "/api/tempos",
    tag = "liturgia",
    responses(
        (status = 200, description = "Categories", body = Vec<String>)
    )
)]
pub async fn get_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let categories = state.songs.categories().await?;
    Ok(Json(categories))
}
