//! Capsule import and export
//!
//! Export produces the pretty-printed JSON document the capsule schema
//! defines; import validates a document strictly before writing anything.

mod export;
mod import;

pub use export::{export_file_name, export_json};
pub use import::{import_json, ImportError};
