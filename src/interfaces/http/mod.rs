//! HTTP REST API interfaces
//!
//! - `modules`: Request handlers and DTOs per resource
//! - `common`: Shared extractors
//! - `error`: Mapping of failures onto status codes and bodies
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod modules;
pub mod router;

pub use error::ApiError;
pub use router::create_api_router;
