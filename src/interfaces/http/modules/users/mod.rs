//! Users module: create, fetch, delete and export users by OIB

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
