use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::storage::{
    Capsule, CapsuleStorage, Flashcard, Level, QuizQuestion, Resource, StorageError,
    ValidationError,
};

/// Idle delay before a dirty draft is autosaved
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

/// One editable flashcard row
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

/// One editable quiz question block: prompt, four choices, the correct
/// choice, and an optional explanation
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub prompt: String,
    pub choices: [String; 4],
    pub answer_index: usize,
    pub explanation: String,
}

impl Default for QuestionDraft {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            choices: Default::default(),
            answer_index: 0,
            explanation: String::new(),
        }
    }
}

/// Editor state for one author session
#[derive(Debug, Clone, Default)]
pub struct CapsuleDraft {
    capsule_id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
    resources: Vec<Resource>,

    pub title: String,
    pub subject: String,
    pub level: Level,
    pub description: String,
    /// Notes as edited, one per line
    pub notes: String,
    pub cards: Vec<CardDraft>,
    pub questions: Vec<QuestionDraft>,

    dirty: bool,
}

impl CapsuleDraft {
    /// Blank draft for a new capsule
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-populated from an existing capsule
    pub fn from_capsule(capsule: &Capsule) -> Self {
        Self {
            capsule_id: Some(capsule.id),
            created_at: Some(capsule.meta.created_at),
            resources: capsule.resources.clone(),
            title: capsule.meta.title.clone(),
            subject: capsule.meta.subject.clone(),
            level: capsule.meta.level,
            description: capsule.meta.description.clone(),
            notes: capsule.notes.join("\n"),
            cards: capsule
                .flashcards
                .iter()
                .map(|card| CardDraft {
                    front: card.front.clone(),
                    back: card.back.clone(),
                })
                .collect(),
            questions: capsule
                .quiz
                .iter()
                .map(|q| QuestionDraft {
                    prompt: q.prompt.clone(),
                    choices: q.choices.clone(),
                    answer_index: q.answer_index,
                    explanation: q.explanation.clone().unwrap_or_default(),
                })
                .collect(),
            dirty: false,
        }
    }

    /// Id of the capsule being edited, once it has been saved
    pub fn id(&self) -> Option<Uuid> {
        self.capsule_id
    }

    pub fn add_card(&mut self) {
        self.cards.push(CardDraft::default());
        self.touch();
    }

    pub fn remove_card(&mut self, index: usize) {
        if index < self.cards.len() {
            self.cards.remove(index);
            self.touch();
        }
    }

    pub fn add_question(&mut self) {
        self.questions.push(QuestionDraft::default());
        self.touch();
    }

    pub fn remove_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
            self.touch();
        }
    }

    /// Mark the draft as edited. The caller schedules the autosave timer.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Assemble the candidate capsule: fields trimmed, blank note lines,
    /// empty card rows, and empty question blocks dropped.
    pub fn collect(&self) -> Capsule {
        let notes: Vec<String> = self
            .notes
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let flashcards: Vec<Flashcard> = self
            .cards
            .iter()
            .map(|card| Flashcard {
                front: card.front.trim().to_string(),
                back: card.back.trim().to_string(),
            })
            .filter(|card| !card.front.is_empty() || !card.back.is_empty())
            .collect();

        let quiz: Vec<QuizQuestion> = self
            .questions
            .iter()
            .filter(|q| {
                !q.prompt.trim().is_empty() && q.choices.iter().any(|c| !c.trim().is_empty())
            })
            .map(|q| QuizQuestion {
                prompt: q.prompt.trim().to_string(),
                choices: q.choices.clone().map(|c| c.trim().to_string()),
                answer_index: q.answer_index.min(3),
                explanation: match q.explanation.trim() {
                    "" => None,
                    text => Some(text.to_string()),
                },
            })
            .collect();

        let mut capsule = Capsule::new(self.title.trim().to_string());
        if let Some(id) = self.capsule_id {
            capsule.id = id;
        }
        if let Some(created_at) = self.created_at {
            capsule.meta.created_at = created_at;
        }
        capsule.meta.subject = self.subject.trim().to_string();
        capsule.meta.level = self.level;
        capsule.meta.description = self.description.trim().to_string();
        capsule.notes = notes;
        capsule.flashcards = flashcards;
        capsule.quiz = quiz;
        capsule.resources = self.resources.clone();
        capsule
    }

    /// Check the capsule invariant against the collected form
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.collect().validate()
    }

    /// Persist the collected capsule and clear the dirty flag. Used by
    /// both explicit save and autosave; the caller decides what to
    /// announce.
    pub fn save(&mut self, storage: &CapsuleStorage) -> Result<Uuid, StorageError> {
        let mut capsule = self.collect();
        let id = storage.save_capsule(&mut capsule)?;
        self.capsule_id = Some(id);
        self.created_at = Some(capsule.meta.created_at);
        self.dirty = false;
        Ok(id)
    }
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

    #[test]
    fn test_collect_splits_and_trims_notes() {
        let mut draft = CapsuleDraft::new();
        draft.title = "Stars".to_string();
        draft.notes = "  first \n\n second\n   ".to_string();

        let capsule = draft.collect();
        assert_eq!(capsule.notes, vec!["first", "second"]);
    }

    #[test]
    fn test_collect_drops_empty_card_rows() {
        let mut draft = CapsuleDraft::new();
        draft.title = "Stars".to_string();
        draft.cards = vec![
            CardDraft {
                front: "Sun".to_string(),
                back: String::new(),
            },
            CardDraft::default(),
        ];

        let capsule = draft.collect();
        assert_eq!(capsule.flashcards.len(), 1);
        assert_eq!(capsule.flashcards[0].front, "Sun");
    }

    #[test]
    fn test_collect_drops_empty_question_blocks() {
        let mut draft = CapsuleDraft::new();
        draft.title = "Stars".to_string();

        let mut kept = QuestionDraft::default();
        kept.prompt = "What is the Sun?".to_string();
        kept.choices[0] = "A star".to_string();
        kept.explanation = "  ".to_string();

        let mut no_choices = QuestionDraft::default();
        no_choices.prompt = "Orphan prompt".to_string();

        draft.questions = vec![kept, no_choices, QuestionDraft::default()];

        let capsule = draft.collect();
        assert_eq!(capsule.quiz.len(), 1);
        assert_eq!(capsule.quiz[0].prompt, "What is the Sun?");
        assert_eq!(capsule.quiz[0].explanation, None);
    }

    #[test]
    fn test_validate_surfaces_missing_title() {
        let mut draft = CapsuleDraft::new();
        draft.notes = "a".to_string();
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_save_assigns_id_and_clears_dirty() {
        let (_dir, storage) = test_storage();
        let mut draft = CapsuleDraft::new();
        draft.title = "Stars".to_string();
        draft.notes = "a".to_string();
        draft.touch();

        let id = draft.save(&storage).unwrap();
        assert_eq!(draft.id(), Some(id));
        assert!(!draft.is_dirty());
        assert!(storage.load_capsule(id).is_ok());
    }

    #[test]
    fn test_resave_keeps_id_and_created_at() {
        let (_dir, storage) = test_storage();
        let mut draft = CapsuleDraft::new();
        draft.title = "Stars".to_string();
        draft.notes = "a".to_string();

        let id = draft.save(&storage).unwrap();
        let created_at = storage.load_capsule(id).unwrap().meta.created_at;

        draft.notes = "a\nb".to_string();
        draft.touch();
        let second = draft.save(&storage).unwrap();

        assert_eq!(second, id);
        assert_eq!(storage.load_capsule(id).unwrap().meta.created_at, created_at);
        assert_eq!(storage.load_index().len(), 1);
    }

    #[test]
    fn test_from_capsule_roundtrip() {
        let mut capsule = Capsule::new("Stars".to_string());
        capsule.meta.subject = "Astronomy".to_string();
        capsule.meta.level = Level::Advanced;
        capsule.notes = vec!["a".to_string(), "b".to_string()];
        capsule.quiz.push(QuizQuestion {
            prompt: "?".to_string(),
            choices: [
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            answer_index: 2,
            explanation: Some("because".to_string()),
        });

        let draft = CapsuleDraft::from_capsule(&capsule);
        let collected = draft.collect();

        assert_eq!(collected.id, capsule.id);
        assert_eq!(collected.meta.level, Level::Advanced);
        assert_eq!(collected.notes, capsule.notes);
        assert_eq!(collected.quiz[0].answer_index, 2);
        assert_eq!(collected.quiz[0].explanation.as_deref(), Some("because"));
    }
}
