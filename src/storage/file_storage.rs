//! JSON-file persistence for capsules, progress, and the library index
//!
//! Directory structure:
//! ```text
//! <base>/
//! ├── index.json           # Denormalized Vec<IndexEntry>
//! ├── capsules/
//! │   └── {capsule-id}.json
//! └── progress/
//!     └── {capsule-id}.json
//! ```
//!
//! Every write path that touches a capsule or its progress re-derives the
//! index entry for that id in the same call, so the summary list can never
//! drift from the records it describes.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Capsule, IndexEntry, Progress, ValidationError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Capsule not found: {0}")]
    CapsuleNotFound(Uuid),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage manager for capsule records, progress records, and the index
pub struct CapsuleStorage {
    base_path: PathBuf,
}

impl CapsuleStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("pocket-classroom"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize the storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.capsules_dir())?;
        fs::create_dir_all(self.progress_dir())?;
        Ok(())
    }

    fn index_path(&self) -> PathBuf {
        self.base_path.join("index.json")
    }

    fn capsules_dir(&self) -> PathBuf {
        self.base_path.join("capsules")
    }

    fn capsule_path(&self, id: Uuid) -> PathBuf {
        self.capsules_dir().join(format!("{}.json", id))
    }

    fn progress_dir(&self) -> PathBuf {
        self.base_path.join("progress")
    }

    fn progress_path(&self, id: Uuid) -> PathBuf {
        self.progress_dir().join(format!("{}.json", id))
    }

    // ==================== Index Operations ====================

    /// Load the library index. Absent or malformed data yields an empty
    /// list rather than an error.
    pub fn load_index(&self) -> Vec<IndexEntry> {
        let path = self.index_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Discarding malformed index at {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    fn save_index(&self, entries: &[IndexEntry]) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(self.index_path(), content)?;
        Ok(())
    }

    /// Recompute the index entry for a capsule from its current record and
    /// progress, and upsert it into the index. Private so record writes
    /// and index updates cannot be reached separately.
    fn refresh_index_entry(&self, id: Uuid) -> Result<()> {
        let capsule = self.load_capsule(id)?;
        let progress = self.load_progress(id);
        let entry = IndexEntry::for_capsule(&capsule, &progress);

        let mut entries = self.load_index();
        match entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        self.save_index(&entries)
    }

    // ==================== Capsule Operations ====================

    /// Load a capsule by id. A corrupt record is treated as absent.
    pub fn load_capsule(&self, id: Uuid) -> Result<Capsule> {
        let path = self.capsule_path(id);
        if !path.exists() {
            return Err(StorageError::CapsuleNotFound(id));
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(capsule) => Ok(capsule),
            Err(e) => {
                log::warn!("Discarding malformed capsule at {:?}: {}", path, e);
                Err(StorageError::CapsuleNotFound(id))
            }
        }
    }

    /// Validate and persist a capsule, then refresh its index entry.
    /// Stamps `updated_at`; assigns a fresh id if the capsule has none.
    pub fn save_capsule(&self, capsule: &mut Capsule) -> Result<Uuid> {
        capsule.validate()?;
        self.init()?;

        if capsule.id.is_nil() {
            capsule.id = Uuid::new_v4();
        }
        capsule.meta.updated_at = Utc::now();

        let content = serde_json::to_string_pretty(capsule)?;
        fs::write(self.capsule_path(capsule.id), content)?;

        self.refresh_index_entry(capsule.id)?;
        Ok(capsule.id)
    }

    /// Delete a capsule, its progress record, and its index entry
    pub fn delete_capsule(&self, id: Uuid) -> Result<()> {
        let capsule_path = self.capsule_path(id);
        if !capsule_path.exists() {
            return Err(StorageError::CapsuleNotFound(id));
        }
        fs::remove_file(&capsule_path)?;

        let progress_path = self.progress_path(id);
        if progress_path.exists() {
            fs::remove_file(&progress_path)?;
        }

        let mut entries = self.load_index();
        entries.retain(|e| e.id != id);
        self.save_index(&entries)?;

        log::info!("Deleted capsule {}", id);
        Ok(())
    }

    // ==================== Progress Operations ====================

    /// Load the progress record for a capsule, defaulting when absent or
    /// malformed.
    pub fn load_progress(&self, id: Uuid) -> Progress {
        let path = self.progress_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Progress::default(),
        };

        match serde_json::from_str(&content) {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("Discarding malformed progress at {:?}: {}", path, e);
                Progress::default()
            }
        }
    }

    /// Persist a progress record, then refresh the capsule's index entry
    pub fn save_progress(&self, id: Uuid, progress: &Progress) -> Result<()> {
        self.init()?;
        let content = serde_json::to_string_pretty(progress)?;
        fs::write(self.progress_path(id), content)?;
        self.refresh_index_entry(id)
    }

    /// Mark a flashcard as known or unknown. Idempotent; returns the
    /// resulting progress.
    pub fn set_card_known(&self, id: Uuid, card_index: usize, known: bool) -> Result<Progress> {
        let mut progress = self.load_progress(id);
        let changed = if known {
            progress.known_cards.insert(card_index)
        } else {
            progress.known_cards.remove(&card_index)
        };

        if changed {
            self.save_progress(id, &progress)?;
        }
        Ok(progress)
    }

    /// Record a quiz score, keeping the stored best only if the new score
    /// is strictly greater. Returns the resulting progress.
    pub fn record_quiz_score(&self, id: Uuid, score: u32) -> Result<Progress> {
        let mut progress = self.load_progress(id);
        if score > progress.best_score {
            progress.best_score = score;
            self.save_progress(id, &progress)?;
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Flashcard;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, CapsuleStorage) {
        let dir = TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();
        (dir, storage)
    }

    fn sample_capsule() -> Capsule {
        let mut capsule = Capsule::new("Stars".to_string());
        capsule.meta.subject = "Astronomy".to_string();
        capsule.notes.push("Space is mostly silent".to_string());
        capsule.flashcards.push(Flashcard {
            front: "Sun".to_string(),
            back: "A medium-sized star".to_string(),
        });
        capsule
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, storage) = test_storage();
        let mut capsule = sample_capsule();

        let id = storage.save_capsule(&mut capsule).unwrap();
        let loaded = storage.load_capsule(id).unwrap();

        assert_eq!(loaded.meta.title, "Stars");
        assert_eq!(loaded.notes.len(), 1);
        assert_eq!(loaded.flashcards.len(), 1);
    }

    #[test]
    fn test_save_rejects_missing_title() {
        let (_dir, storage) = test_storage();
        let mut capsule = Capsule::new(String::new());
        capsule.notes.push("a".to_string());

        let err = storage.save_capsule(&mut capsule).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Invalid(ValidationError::MissingTitle)
        ));
        assert!(storage.load_index().is_empty());
    }

    #[test]
    fn test_save_rejects_empty_capsule() {
        let (_dir, storage) = test_storage();
        let mut capsule = Capsule::new("Stars".to_string());

        let err = storage.save_capsule(&mut capsule).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Invalid(ValidationError::NoContent)
        ));
    }

    #[test]
    fn test_save_upserts_index_entry() {
        let (_dir, storage) = test_storage();
        let mut capsule = sample_capsule();
        let id = storage.save_capsule(&mut capsule).unwrap();

        let index = storage.load_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].id, id);
        assert_eq!(index[0].title, "Stars");

        capsule.meta.title = "Stars and Planets".to_string();
        storage.save_capsule(&mut capsule).unwrap();

        let index = storage.load_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].title, "Stars and Planets");
    }

    #[test]
    fn test_delete_removes_record_progress_and_index_entry() {
        let (_dir, storage) = test_storage();
        let mut capsule = sample_capsule();
        let id = storage.save_capsule(&mut capsule).unwrap();
        storage.set_card_known(id, 0, true).unwrap();

        storage.delete_capsule(id).unwrap();

        assert!(matches!(
            storage.load_capsule(id),
            Err(StorageError::CapsuleNotFound(_))
        ));
        assert!(storage.load_index().is_empty());
        assert!(storage.load_progress(id).known_cards.is_empty());
    }

    #[test]
    fn test_delete_missing_capsule_fails() {
        let (_dir, storage) = test_storage();
        assert!(matches!(
            storage.delete_capsule(Uuid::new_v4()),
            Err(StorageError::CapsuleNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_index_is_treated_as_empty() {
        let (dir, storage) = test_storage();
        fs::write(dir.path().join("index.json"), "{ not json").unwrap();
        assert!(storage.load_index().is_empty());
    }

    #[test]
    fn test_malformed_progress_is_treated_as_default() {
        let (dir, storage) = test_storage();
        let mut capsule = sample_capsule();
        let id = storage.save_capsule(&mut capsule).unwrap();

        fs::write(
            dir.path().join("progress").join(format!("{}.json", id)),
            "not json",
        )
        .unwrap();

        let progress = storage.load_progress(id);
        assert!(progress.known_cards.is_empty());
        assert_eq!(progress.best_score, 0);
    }

    #[test]
    fn test_set_card_known_updates_index_count() {
        let (_dir, storage) = test_storage();
        let mut capsule = sample_capsule();
        let id = storage.save_capsule(&mut capsule).unwrap();

        storage.set_card_known(id, 0, true).unwrap();
        assert_eq!(storage.load_index()[0].known_count, 1);

        // Marking the same card again is idempotent
        storage.set_card_known(id, 0, true).unwrap();
        assert_eq!(storage.load_index()[0].known_count, 1);

        storage.set_card_known(id, 0, false).unwrap();
        assert_eq!(storage.load_index()[0].known_count, 0);
    }

    #[test]
    fn test_record_quiz_score_keeps_best() {
        let (_dir, storage) = test_storage();
        let mut capsule = sample_capsule();
        let id = storage.save_capsule(&mut capsule).unwrap();

        let progress = storage.record_quiz_score(id, 60).unwrap();
        assert_eq!(progress.best_score, 60);

        // A lower score leaves the stored best unchanged
        let progress = storage.record_quiz_score(id, 40).unwrap();
        assert_eq!(progress.best_score, 60);
        assert_eq!(storage.load_progress(id).best_score, 60);

        // An equal score is not an improvement either
        storage.record_quiz_score(id, 60).unwrap();
        assert_eq!(storage.load_progress(id).best_score, 60);

        let progress = storage.record_quiz_score(id, 80).unwrap();
        assert_eq!(progress.best_score, 80);
        assert_eq!(storage.load_index()[0].best_score, 80);
    }
}
