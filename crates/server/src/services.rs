mod auth;
mod highlight;
mod repertoire;
mod song;

pub use auth::{AuthError, AuthService};
pub use highlight::{HighlightError, HighlightService};
pub use repertoire::RepertoireService;
pub use song::{PageRequest, SongError, SongService};
