//! Capsule export to a standalone JSON document

use uuid::Uuid;

use crate::storage::{Capsule, CapsuleStorage, StorageError};

/// Export a capsule as a pretty-printed JSON string
pub fn export_json(storage: &CapsuleStorage, id: Uuid) -> Result<String, StorageError> {
    let capsule = storage.load_capsule(id)?;
    Ok(serde_json::to_string_pretty(&capsule)?)
}

/// File name for an exported capsule: the title with whitespace collapsed
/// to underscores and unsafe characters stripped, suffixed with the id.
pub fn export_file_name(capsule: &Capsule) -> String {
    let mut safe = String::new();
    let mut last_was_space = false;
    for ch in capsule.meta.title.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                safe.push('_');
            }
            last_was_space = true;
        } else if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            safe.push(ch);
            last_was_space = false;
        } else {
            last_was_space = false;
        }
    }

    if safe.is_empty() {
        format!("{}.json", capsule.id)
    } else {
        format!("{}-{}.json", safe, capsule.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SCHEMA_TAG;

    #[test]
    fn test_export_file_name_sanitizes_title() {
        let mut capsule = Capsule::new("Journey Beyond the Stars!".to_string());
        capsule.notes.push("a".to_string());

        let name = export_file_name(&capsule);
        assert!(name.starts_with("Journey_Beyond_the_Stars-"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains('!'));
    }

    #[test]
    fn test_export_file_name_falls_back_to_id() {
        let capsule = Capsule::new("???".to_string());
        let name = export_file_name(&capsule);
        assert_eq!(name, format!("{}.json", capsule.id));
    }

    #[test]
    fn test_export_json_contains_schema_tag() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();

        let mut capsule = Capsule::new("Stars".to_string());
        capsule.notes.push("a".to_string());
        let id = storage.save_capsule(&mut capsule).unwrap();

        let json = export_json(&storage, id).unwrap();
        assert!(json.contains(SCHEMA_TAG));
        assert!(json.contains("Stars"));
    }

    #[test]
    fn test_export_missing_capsule_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();

        assert!(matches!(
            export_json(&storage, Uuid::new_v4()),
            Err(StorageError::CapsuleNotFound(_))
        ));
    }
}
