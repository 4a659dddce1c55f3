use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{SongStore, SqliteSongStore};
use crate::services::{AuthService, HighlightService, RepertoireService, SongService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub songs: Arc<SongService>,
    pub repertoire: Arc<RepertoireService>,
    pub highlights: Arc<HighlightService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        // One store shared by the catalogue and repertoire services
        let store: Arc<dyn SongStore> = Arc::new(SqliteSongStore::new(db.clone()));

        let songs = Arc::new(SongService::new(Arc::clone(&store)));
        let repertoire = Arc::new(RepertoireService::new(store));
        let highlights = Arc::new(HighlightService::new(db.clone()));
        let auth = Arc::new(AuthService::new(&config.auth));

        Self {
            db,
            songs,
            repertoire,
            highlights,
            auth,
        }
    }
}
