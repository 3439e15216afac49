//! User aggregate
//!
//! Contains the User entity, its status codes, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{User, UserStatus, UNSET_ID};
pub use repository::UserRepositoryInterface;
