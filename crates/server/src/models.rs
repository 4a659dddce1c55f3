mod auth;
mod common;
mod highlight;
mod song;

pub use auth::*;
pub use common::*;
pub use highlight::*;
pub use song::*;
