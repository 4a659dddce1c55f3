use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{HealthResponse, MessageResponse};
use crate::error::ErrorResponse;
use crate::models::{
    CreateSong, LoginRequest, LoginResponse, Slide, Song, SongListing, SongPage, UpdateSong,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca Musical API",
        version = "1.0.0"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "musicas", description = "Song catalogue endpoints"),
        (name = "liturgia", description = "Repertoire, moments and liturgical categories"),
        (name = "destaques", description = "Highlight carousel endpoints"),
        (name = "auth", description = "Admin login"),
        (name = "health", description = "Service health")
    ),
    components(schemas(
        Song,
        CreateSong,
        UpdateSong,
        SongPage,
        SongListing,
        Slide,
        LoginRequest,
        LoginResponse,
        ErrorResponse,
        MessageResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by protected endpoints
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
