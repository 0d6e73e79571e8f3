//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, CORS headers)
//!     → OPTIONS? answer 200 locally
//!     → request.rs (strip mount point, build target URL, encode body)
//!     → hyper client → backend origin
//!     → response.rs (decode body, relay status, or structured 500)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ForwardError, PROXY_ERROR_LABEL};
pub use server::{AppState, HttpServer};
