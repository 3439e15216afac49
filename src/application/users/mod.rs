//! Users module: user records and their flat-file export

pub mod export;
pub mod service;

pub use export::{export_file_name, export_line, ExportError, FileExporter};
pub use service::{SharedUserService, UserService};
