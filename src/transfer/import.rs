//! Capsule import with strict validation
//!
//! A document is checked completely before anything is written: JSON
//! shape, schema tag, and the capsule invariant. Import never overwrites
//! an existing record; a colliding or missing id gets a fresh one.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::{Capsule, CapsuleStorage, StorageError, ValidationError, SCHEMA_TAG};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Not a valid capsule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema mismatch: expected \"pocket-classroom/v1\", found {found:?}")]
    SchemaMismatch { found: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Import a capsule JSON document, returning the id it was stored under
pub fn import_json(storage: &CapsuleStorage, text: &str) -> Result<Uuid, ImportError> {
    let mut capsule: Capsule = serde_json::from_str(text)?;

    if capsule.schema != SCHEMA_TAG {
        return Err(ImportError::SchemaMismatch {
            found: capsule.schema,
        });
    }
    capsule.validate()?;

    if capsule.id.is_nil() || storage.load_capsule(capsule.id).is_ok() {
        let fresh = Uuid::new_v4();
        log::info!("Import id collision or missing id, assigning {}", fresh);
        capsule.id = fresh;
    }

    let id = storage.save_capsule(&mut capsule)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (TempDir, CapsuleStorage) {
        let dir = TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();
        (dir, storage)
    }

    fn valid_doc(id: &str) -> String {
        format!(
            r#"{{
              "schema": "pocket-classroom/v1",
              "id": "{}",
              "meta": {{ "title": "Stars" }},
              "notes": ["Space is mostly silent"]
            }}"#,
            id
        )
    }

    #[test]
    fn test_import_valid_document() {
        let (_dir, storage) = test_storage();
        let id = import_json(&storage, &valid_doc(&Uuid::new_v4().to_string())).unwrap();

        let capsule = storage.load_capsule(id).unwrap();
        assert_eq!(capsule.meta.title, "Stars");
        assert_eq!(storage.load_index().len(), 1);
    }

    #[test]
    fn test_import_rejects_schema_mismatch_without_writing() {
        let (_dir, storage) = test_storage();
        let doc = r#"{
          "schema": "pocket-classroom/v2",
          "id": "00000000-0000-0000-0000-000000000000",
          "meta": { "title": "Stars" },
          "notes": ["a"]
        }"#;

        let err = import_json(&storage, doc).unwrap_err();
        assert!(matches!(err, ImportError::SchemaMismatch { .. }));
        assert!(storage.load_index().is_empty());
    }

    #[test]
    fn test_import_rejects_missing_schema() {
        let (_dir, storage) = test_storage();
        let doc = r#"{ "id": "00000000-0000-0000-0000-000000000000", "meta": { "title": "Stars" }, "notes": ["a"] }"#;
        assert!(matches!(
            import_json(&storage, doc),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn test_import_rejects_missing_title() {
        let (_dir, storage) = test_storage();
        let doc = r#"{
          "schema": "pocket-classroom/v1",
          "id": "00000000-0000-0000-0000-000000000000",
          "meta": { "title": "  " },
          "notes": ["a"]
        }"#;

        let err = import_json(&storage, doc).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Invalid(ValidationError::MissingTitle)
        ));
        assert!(storage.load_index().is_empty());
    }

    #[test]
    fn test_import_rejects_empty_content() {
        let (_dir, storage) = test_storage();
        let doc = r#"{
          "schema": "pocket-classroom/v1",
          "id": "00000000-0000-0000-0000-000000000000",
          "meta": { "title": "Stars" }
        }"#;

        let err = import_json(&storage, doc).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Invalid(ValidationError::NoContent)
        ));
    }

    #[test]
    fn test_import_collision_gets_fresh_id() {
        let (_dir, storage) = test_storage();
        let existing = Uuid::new_v4();
        let first = import_json(&storage, &valid_doc(&existing.to_string())).unwrap();
        assert_eq!(first, existing);

        let second = import_json(&storage, &valid_doc(&existing.to_string())).unwrap();
        assert_ne!(second, existing);

        // Both capsules are retrievable, nothing was overwritten
        assert!(storage.load_capsule(first).is_ok());
        assert!(storage.load_capsule(second).is_ok());
        assert_eq!(storage.load_index().len(), 2);
    }

    #[test]
    fn test_import_nil_id_gets_fresh_id() {
        let (_dir, storage) = test_storage();
        let id = import_json(&storage, &valid_doc(&Uuid::nil().to_string())).unwrap();
        assert!(!id.is_nil());
    }

    #[test]
    fn test_import_without_id_gets_fresh_id() {
        let (_dir, storage) = test_storage();
        let doc = r#"{
          "schema": "pocket-classroom/v1",
          "meta": { "title": "Stars" },
          "flashcards": [{ "front": "Sun", "back": "A star" }]
        }"#;

        let id = import_json(&storage, doc).unwrap();
        assert!(!id.is_nil());
        assert_eq!(storage.load_capsule(id).unwrap().flashcards.len(), 1);
    }
}
