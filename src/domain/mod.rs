//! Domain layer: OIB rules, the user aggregate and its repository port.

pub mod error;
pub mod oib;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use oib::{calculate_control_digit, validate_oib, OibError, OIB_LENGTH};
pub use user::{User, UserRepositoryInterface, UserStatus, UNSET_ID};
