//! # OIB User Service
//!
//! Users keyed by their Croatian personal identification number (OIB),
//! exposed over a REST API, with per-user flat-file export.
//!
//! ## Architecture
//!
//! - **domain**: OIB checksum rules, the `User` entity, the store trait
//! - **application**: `UserService` and the file exporter
//! - **infrastructure**: SeaORM/SQLite and in-memory stores
//! - **interfaces**: axum handlers, error mapping, OpenAPI
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository, SeaOrmUserRepository};

pub use interfaces::http::create_api_router;
