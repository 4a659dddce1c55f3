use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{openapi::ApiDoc, state::AppState};

use super::handlers;

pub fn create_router(state: AppState) -> (Router, utoipa::openapi::OpenApi) {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(handlers::list_songs, handlers::create_song))
        .routes(routes!(handlers::list_all_songs))
        .routes(routes!(
            handlers::get_song,
            handlers::update_song,
            handlers::delete_song
        ))
        .routes(routes!(handlers::get_random_repertoire))
        .routes(routes!(handlers::get_moments))
        .routes(routes!(handlers::get_categories))
        .routes(routes!(handlers::get_highlights, handlers::replace_highlights))
        .routes(routes!(handlers::login))
        .routes(routes!(handlers::health))
        .with_state(state)
        .split_for_parts();

    (router, api)
}
