//! Security subsystem.
//!
//! Only response header policy lives here: no authentication, rate limiting
//! or request validation is performed by the gateway.

pub mod headers;

pub use headers::{cors_headers, with_cors};
