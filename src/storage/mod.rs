mod file_storage;
mod models;

pub use file_storage::{CapsuleStorage, StorageError};
pub use models::*;
