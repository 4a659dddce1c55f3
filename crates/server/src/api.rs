mod extract;
pub mod handlers;
mod router;

pub use extract::{AdminSession, ApiJson, ApiPath, ApiQuery};
pub use router::create_router;
