//! Typed client for the autometer backend REST API.
//!
//! # Data Flow
//! ```text
//! ClientConfig (environment, backend origin)
//!     → ApiClient (shared reqwest client, base URL, observers)
//!     → DriverService / VehicleService / FareRateService / RideFareService / SosService
//!     → Endpoint (verb + path template + bindings)
//!     → HTTP call → ApiResponse | ApiError
//! ```
//!
//! In development the client talks to the backend directly; in production it
//! goes through the gateway's `/api` mount.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod observer;
pub mod services;

pub use client::{ApiClient, ApiResponse};
pub use config::{ClientConfig, Environment};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use observer::{LoggingObserver, Observers, RequestObserver, ResponseObserver};
pub use services::{DriverService, FareRateService, RideFareService, SosService, VehicleService};
