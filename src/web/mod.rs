//! Webmail API.
//!
//! Serves the inbox and compose flows over HTTP, optionally next to a static
//! frontend bundle.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
