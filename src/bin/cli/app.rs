use std::path::Path;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use classroom_lib::storage::{CapsuleStorage, IndexEntry};

/// Shared application state for CLI commands and the TUI
pub struct App {
    pub storage: CapsuleStorage,
}

impl App {
    /// Initialize storage at the given path, or the default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let base_path = match data_dir {
            Some(path) => path.to_path_buf(),
            None => CapsuleStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = CapsuleStorage::new(base_path);
        storage.init().context("Failed to initialize storage")?;

        Ok(Self { storage })
    }

    /// Find a capsule index entry by id or title (case-insensitive,
    /// exact match first, then prefix match)
    pub fn find_capsule(&self, name: &str) -> Result<IndexEntry> {
        let entries = self.storage.load_index();

        if let Ok(id) = Uuid::parse_str(name) {
            if let Some(entry) = entries.iter().find(|e| e.id == id) {
                return Ok(entry.clone());
            }
        }

        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(entry) = entries.iter().find(|e| e.title.to_lowercase() == name_lower) {
            return Ok(entry.clone());
        }

        // Prefix match
        let matches: Vec<&IndexEntry> = entries
            .iter()
            .filter(|e| e.title.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No capsule matching '{}'. Available capsules:\n{}",
                name,
                entries
                    .iter()
                    .map(|e| format!("  - {}", e.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous capsule title '{}'. Matches:\n{}",
                name,
                matches
                    .iter()
                    .map(|e| format!("  - {}", e.title))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }
}
