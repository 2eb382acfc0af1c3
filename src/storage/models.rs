//! Capsule data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Schema tag stamped on every persisted capsule and required on import
pub const SCHEMA_TAG: &str = "pocket-classroom/v1";

/// Difficulty level of a capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for Level {
    fn default() -> Self {
        Self::Beginner
    }
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Cycle to the next level, wrapping around
    pub fn next(self) -> Self {
        match self {
            Level::Beginner => Level::Intermediate,
            Level::Intermediate => Level::Advanced,
            Level::Advanced => Level::Beginner,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Level::Beginner => Level::Advanced,
            Level::Intermediate => Level::Beginner,
            Level::Advanced => Level::Intermediate,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capsule metadata shown in the library and the learn header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Default for CapsuleMeta {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            title: String::new(),
            subject: String::new(),
            level: Level::default(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A front/back flashcard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// A multiple-choice quiz question with exactly four choices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: [String; 4],
    pub answer_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// External resource reference. Part of the persisted schema but not yet
/// surfaced anywhere in the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub label: String,
    pub url: String,
}

/// A self-contained learning unit bundling notes, flashcards, and a quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    pub schema: String,
    /// Nil when the document carried no id; storage assigns a fresh one
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub meta: CapsuleMeta,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Violation of the capsule invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("At least one of notes, flashcards, or quiz must be present")]
    NoContent,
}

impl Capsule {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            schema: SCHEMA_TAG.to_string(),
            id: Uuid::new_v4(),
            meta: CapsuleMeta {
                title,
                subject: String::new(),
                level: Level::default(),
                description: String::new(),
                created_at: now,
                updated_at: now,
            },
            notes: Vec::new(),
            flashcards: Vec::new(),
            quiz: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Whether any of the three content sections is non-empty
    pub fn has_content(&self) -> bool {
        !self.notes.is_empty() || !self.flashcards.is_empty() || !self.quiz.is_empty()
    }

    /// Check the capsule invariant: non-empty title and at least one
    /// content section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.meta.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if !self.has_content() {
            return Err(ValidationError::NoContent);
        }
        Ok(())
    }
}

/// Per-capsule learner state, mutated independently of capsule content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Indices into the capsule's flashcard list marked as known
    #[serde(default)]
    pub known_cards: BTreeSet<usize>,
    /// Best quiz score achieved, as a percentage
    #[serde(default)]
    pub best_score: u32,
}

/// Denormalized per-capsule summary used by the library view so listing
/// never has to load full records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub level: Level,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub best_score: u32,
    #[serde(default)]
    pub known_count: usize,
}

impl IndexEntry {
    /// Recompute the summary from the capsule and its progress record
    pub fn for_capsule(capsule: &Capsule, progress: &Progress) -> Self {
        Self {
            id: capsule.id,
            title: capsule.meta.title.clone(),
            subject: capsule.meta.subject.clone(),
            level: capsule.meta.level,
            updated_at: capsule.meta.updated_at,
            best_score: progress.best_score,
            known_count: progress.known_cards.len(),
        }
    }
}
