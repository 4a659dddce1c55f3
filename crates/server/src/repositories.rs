mod highlight;
mod song;

pub use highlight::HighlightRepository;
pub use song::{SongFilter, SongStore, SqliteSongStore, Window};
