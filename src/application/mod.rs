pub mod users;

// Re-export key types for convenience
pub use users::{ExportError, FileExporter, SharedUserService, UserService};
