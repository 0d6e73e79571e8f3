//! Autometer gateway library.
//!
//! Forwards browser traffic under a mount point (`/api` by default) to the
//! autometer backend origin, adding permissive CORS headers and relaying every
//! backend body as JSON.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
