mod auth;
mod health;
mod highlights;
mod liturgy;
mod songs;

// Re-export all handlers
pub use auth::login;
pub use health::{health, HealthResponse};
pub use highlights::{get_highlights, replace_highlights};
pub use liturgy::{get_categories, get_moments, get_random_repertoire, CategoryQuery};
pub use songs::{
    create_song, delete_song, get_song, list_all_songs, list_songs, update_song, ListSongsQuery,
    MessageResponse,
};

// Re-export utoipa path structs for OpenAPI routing
#[doc(hidden)]
pub use auth::__path_login;
#[doc(hidden)]
pub use health::__path_health;
#[doc(hidden)]
pub use highlights::{__path_get_highlights, __path_replace_highlights};
#[doc(hidden)]
pub use liturgy::{__path_get_categories, __path_get_moments, __path_get_random_repertoire};
#[doc(hidden)]
pub use songs::{
    __path_create_song, __path_delete_song, __path_get_song, __path_list_all_songs,
    __path_list_songs, __path_update_song,
};
