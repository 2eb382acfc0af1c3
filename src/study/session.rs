use std::collections::BTreeSet;
use std::time::Duration;

use uuid::Uuid;

use crate::storage::{Capsule, CapsuleStorage, Flashcard, QuizQuestion, StorageError};

/// Idle delay before the notes filter is re-applied
pub const NOTES_SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// How long a locked quiz question stays on screen before advancing
pub const QUIZ_REVEAL_DELAY: Duration = Duration::from_millis(2500);

/// The three mutually exclusive learn subviews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subview {
    Notes,
    Flashcards,
    Quiz,
}

impl Subview {
    const ORDER: [Subview; 3] = [Subview::Notes, Subview::Flashcards, Subview::Quiz];

    pub fn next(self) -> Self {
        let pos = Self::ORDER.iter().position(|s| *s == self).unwrap_or(0);
        Self::ORDER[(pos + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ORDER.iter().position(|s| *s == self).unwrap_or(0);
        Self::ORDER[(pos + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Where the single-pass quiz run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    /// Waiting for the learner to pick a choice
    Prompt,
    /// A choice was picked; everything is locked until the reveal delay
    /// elapses and the run advances
    Revealed { selected: usize },
    /// Past the last question
    Finished { score: u32 },
}

/// Per-session learn state for one capsule
pub struct StudySession {
    capsule: Capsule,
    known: BTreeSet<usize>,

    pub subview: Subview,

    card_index: usize,
    flipped: bool,

    quiz_index: usize,
    quiz_correct: usize,
    quiz_stage: QuizStage,
}

impl StudySession {
    /// Load the capsule and its progress and open on the notes subview
    pub fn open(storage: &CapsuleStorage, id: Uuid) -> Result<Self, StorageError> {
        let capsule = storage.load_capsule(id)?;
        let progress = storage.load_progress(id);

        Ok(Self {
            capsule,
            known: progress.known_cards,
            subview: Subview::Notes,
            card_index: 0,
            flipped: false,
            quiz_index: 0,
            quiz_correct: 0,
            quiz_stage: QuizStage::Prompt,
        })
    }

    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    pub fn id(&self) -> Uuid {
        self.capsule.id
    }

    // ==================== Subviews ====================

    /// Switch subviews. Entering the quiz restarts its run.
    pub fn show(&mut self, subview: Subview) {
        if subview == Subview::Quiz && self.subview != Subview::Quiz {
            self.quiz_index = 0;
            self.quiz_correct = 0;
            self.quiz_stage = QuizStage::Prompt;
        }
        self.subview = subview;
    }

    /// Cycle subviews forward (`1`) or backward (`-1`)
    pub fn cycle(&mut self, forward: bool) {
        let next = if forward {
            self.subview.next()
        } else {
            self.subview.prev()
        };
        self.show(next);
    }

    // ==================== Notes ====================

    /// Case-insensitive substring filter over note lines
    pub fn filtered_notes(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.capsule
            .notes
            .iter()
            .filter(|note| note.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    // ==================== Flashcards ====================

    pub fn card_count(&self) -> usize {
        self.capsule.flashcards.len()
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.capsule.flashcards.get(self.card_index)
    }

    pub fn card_index(&self) -> usize {
        self.card_index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.capsule.flashcards.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Move to another card, clamped to the list; always lands front-up
    pub fn go_to_card(&mut self, index: isize) {
        if self.capsule.flashcards.is_empty() {
            return;
        }
        let max = self.capsule.flashcards.len() - 1;
        self.card_index = index.clamp(0, max as isize) as usize;
        self.flipped = false;
    }

    pub fn next_card(&mut self) {
        self.go_to_card(self.card_index as isize + 1);
    }

    pub fn prev_card(&mut self) {
        self.go_to_card(self.card_index as isize - 1);
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn current_card_known(&self) -> bool {
        self.known.contains(&self.card_index)
    }

    /// Mark the current card known or unknown, persisting immediately
    /// (which also refreshes the capsule's index entry)
    pub fn set_known(&mut self, storage: &CapsuleStorage, known: bool) -> Result<(), StorageError> {
        if self.capsule.flashcards.is_empty() {
            return Ok(());
        }
        let progress = storage.set_card_known(self.capsule.id, self.card_index, known)?;
        self.known = progress.known_cards;
        Ok(())
    }

    // ==================== Quiz ====================

    pub fn quiz_len(&self) -> usize {
        self.capsule.quiz.len()
    }

    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    pub fn quiz_stage(&self) -> QuizStage {
        self.quiz_stage
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.capsule.quiz.get(self.quiz_index)
    }

    /// Pick a choice for the current question. Returns false if there is
    /// no open question (empty quiz, already answered, or finished).
    /// The caller schedules the reveal delay after an accepted answer.
    pub fn answer(&mut self, choice: usize) -> bool {
        if self.quiz_stage != QuizStage::Prompt || choice > 3 {
            return false;
        }
        let Some(question) = self.capsule.quiz.get(self.quiz_index) else {
            return false;
        };

        if choice == question.answer_index {
            self.quiz_correct += 1;
        }
        self.quiz_stage = QuizStage::Revealed { selected: choice };
        true
    }

    /// Move past a revealed question once the delay has elapsed. After
    /// the last question the score is computed and persisted under the
    /// strictly-greater rule.
    pub fn advance_quiz(&mut self, storage: &CapsuleStorage) -> Result<(), StorageError> {
        if !matches!(self.quiz_stage, QuizStage::Revealed { .. }) {
            return Ok(());
        }

        self.quiz_index += 1;
        if self.quiz_index >= self.capsule.quiz.len() {
            let total = self.capsule.quiz.len().max(1);
            let score = ((self.quiz_correct * 100) as f64 / total as f64).round() as u32;
            storage.record_quiz_score(self.capsule.id, score)?;
            self.quiz_stage = QuizStage::Finished { score };
        } else {
            self.quiz_stage = QuizStage::Prompt;
        }
        Ok(())
    }

    pub fn quiz_correct(&self) -> usize {
        self.quiz_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Capsule, Flashcard, QuizQuestion};
    use tempfile::TempDir;

    fn question(prompt: &str, answer_index: usize) -> QuizQuestion {
        QuizQuestion {
            prompt: prompt.to_string(),
            choices: [
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            answer_index,
            explanation: None,
        }
    }

    fn session_with(capsule: Capsule) -> (TempDir, CapsuleStorage, StudySession) {
        let dir = TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();

        let mut capsule = capsule;
        let id = storage.save_capsule(&mut capsule).unwrap();
        let session = StudySession::open(&storage, id).unwrap();
        (dir, storage, session)
    }

    fn study_capsule() -> Capsule {
        let mut capsule = Capsule::new("Stars".to_string());
        capsule.notes = vec![
            "Space is mostly silent".to_string(),
            "Stars have life cycles".to_string(),
        ];
        capsule.flashcards = vec![
            Flashcard {
                front: "Sun".to_string(),
                back: "A medium-sized star".to_string(),
            },
            Flashcard {
                front: "Nebula".to_string(),
                back: "A stellar nursery".to_string(),
            },
        ];
        capsule.quiz = vec![question("q1", 0), question("q2", 1)];
        capsule
    }

    #[test]
    fn test_open_missing_capsule_fails() {
        let dir = TempDir::new().unwrap();
        let storage = CapsuleStorage::new(dir.path().to_path_buf());
        storage.init().unwrap();

        assert!(matches!(
            StudySession::open(&storage, Uuid::new_v4()),
            Err(StorageError::CapsuleNotFound(_))
        ));
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let (_dir, _storage, mut session) = session_with(study_capsule());
        assert_eq!(session.subview, Subview::Notes);

        session.cycle(false);
        assert_eq!(session.subview, Subview::Quiz);
        session.cycle(true);
        assert_eq!(session.subview, Subview::Notes);
        session.cycle(true);
        assert_eq!(session.subview, Subview::Flashcards);
    }

    #[test]
    fn test_filtered_notes_is_case_insensitive() {
        let (_dir, _storage, session) = session_with(study_capsule());
        assert_eq!(session.filtered_notes("SILENT").len(), 1);
        assert_eq!(session.filtered_notes("").len(), 2);
        assert!(session.filtered_notes("nebula").is_empty());
    }

    #[test]
    fn test_navigation_clamps_and_resets_flip() {
        let (_dir, _storage, mut session) = session_with(study_capsule());

        session.flip();
        assert!(session.is_flipped());

        session.next_card();
        assert_eq!(session.card_index(), 1);
        assert!(!session.is_flipped());

        session.next_card();
        assert_eq!(session.card_index(), 1);

        session.prev_card();
        session.prev_card();
        assert_eq!(session.card_index(), 0);
    }

    #[test]
    fn test_flip_and_navigation_do_not_touch_known_set() {
        let (_dir, storage, mut session) = session_with(study_capsule());
        session.set_known(&storage, true).unwrap();

        session.flip();
        session.next_card();
        session.prev_card();

        assert_eq!(session.known_count(), 1);
        assert_eq!(storage.load_progress(session.id()).known_cards.len(), 1);
    }

    #[test]
    fn test_set_known_persists_and_is_idempotent() {
        let (_dir, storage, mut session) = session_with(study_capsule());

        session.set_known(&storage, true).unwrap();
        session.set_known(&storage, true).unwrap();
        assert_eq!(session.known_count(), 1);
        assert_eq!(storage.load_index()[0].known_count, 1);

        session.set_known(&storage, false).unwrap();
        assert_eq!(session.known_count(), 0);
        assert_eq!(storage.load_index()[0].known_count, 0);
    }

    #[test]
    fn test_quiz_single_pass_scores_and_persists_best() {
        let (_dir, storage, mut session) = session_with(study_capsule());
        session.show(Subview::Quiz);

        // First question answered correctly
        assert!(session.answer(0));
        assert_eq!(session.quiz_stage(), QuizStage::Revealed { selected: 0 });
        // Locked until advanced
        assert!(!session.answer(1));
        session.advance_quiz(&storage).unwrap();

        // Second question answered incorrectly
        assert!(session.answer(3));
        session.advance_quiz(&storage).unwrap();

        assert_eq!(session.quiz_stage(), QuizStage::Finished { score: 50 });
        assert_eq!(storage.load_progress(session.id()).best_score, 50);
    }

    #[test]
    fn test_quiz_reentry_restarts_run() {
        let (_dir, storage, mut session) = session_with(study_capsule());
        session.show(Subview::Quiz);
        session.answer(0);
        session.advance_quiz(&storage).unwrap();

        session.show(Subview::Notes);
        session.show(Subview::Quiz);

        assert_eq!(session.quiz_index(), 0);
        assert_eq!(session.quiz_correct(), 0);
        assert_eq!(session.quiz_stage(), QuizStage::Prompt);
    }

    #[test]
    fn test_lower_rerun_does_not_clobber_best() {
        let (_dir, storage, mut session) = session_with(study_capsule());

        session.show(Subview::Quiz);
        session.answer(0);
        session.advance_quiz(&storage).unwrap();
        session.answer(1);
        session.advance_quiz(&storage).unwrap();
        assert_eq!(session.quiz_stage(), QuizStage::Finished { score: 100 });

        // Second run, all wrong
        session.show(Subview::Notes);
        session.show(Subview::Quiz);
        session.answer(3);
        session.advance_quiz(&storage).unwrap();
        session.answer(3);
        session.advance_quiz(&storage).unwrap();

        assert_eq!(session.quiz_stage(), QuizStage::Finished { score: 0 });
        assert_eq!(storage.load_progress(session.id()).best_score, 100);
    }

    #[test]
    fn test_answer_rejected_on_empty_quiz() {
        let mut capsule = Capsule::new("Notes only".to_string());
        capsule.notes.push("a".to_string());
        let (_dir, _storage, mut session) = session_with(capsule);

        session.show(Subview::Quiz);
        assert!(!session.answer(0));
        assert_eq!(session.quiz_stage(), QuizStage::Prompt);
    }
}
