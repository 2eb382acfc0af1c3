use std::fs;

use uuid::Uuid;

use classroom_lib::author::{CapsuleDraft, AUTOSAVE_DELAY};
use classroom_lib::events::{AppEvent, EventBus};
use classroom_lib::storage::IndexEntry;
use classroom_lib::study::{StudySession, NOTES_SEARCH_DEBOUNCE, QUIZ_REVEAL_DELAY};
use classroom_lib::timers::TimerSet;
use classroom_lib::transfer::{export_file_name, export_json, import_json};

use crate::app::App;

/// The three top-level views; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Author,
    Learn,
}

/// Purposes with at most one pending deadline each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Debounced non-final save of a dirty draft
    Autosave,
    /// Debounced re-apply of the notes filter
    NotesSearch,
    /// Delay between answering a quiz question and advancing
    QuizReveal,
}

/// Status-bar interactions owned by the library view
#[derive(Debug, Clone)]
pub enum LibraryPrompt {
    /// Waiting for y/N on deleting the named capsule
    ConfirmDelete(Uuid, String),
    /// Collecting a path to a capsule JSON file
    ImportPath,
}

/// Focusable fields of the author form, in visual order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorField {
    Title,
    Subject,
    Level,
    Description,
    Notes,
    CardFront(usize),
    CardBack(usize),
    QuestionPrompt(usize),
    QuestionChoice(usize, usize),
    QuestionAnswer(usize),
    QuestionExplanation(usize),
}

/// Author view state: the draft plus form focus
pub struct AuthorView {
    pub draft: CapsuleDraft,
    pub focus: AuthorField,
    /// Transient notice under the form: (text, is_error)
    pub message: Option<(String, bool)>,
    pub scroll: usize,
}

impl AuthorView {
    fn new(draft: CapsuleDraft) -> Self {
        Self {
            draft,
            focus: AuthorField::Title,
            message: None,
            scroll: 0,
        }
    }

    /// All focusable fields for the current draft shape
    pub fn field_order(&self) -> Vec<AuthorField> {
        let mut order = vec![
            AuthorField::Title,
            AuthorField::Subject,
            AuthorField::Level,
            AuthorField::Description,
            AuthorField::Notes,
        ];
        for i in 0..self.draft.cards.len() {
            order.push(AuthorField::CardFront(i));
            order.push(AuthorField::CardBack(i));
        }
        for i in 0..self.draft.questions.len() {
            order.push(AuthorField::QuestionPrompt(i));
            for c in 0..4 {
                order.push(AuthorField::QuestionChoice(i, c));
            }
            order.push(AuthorField::QuestionAnswer(i));
            order.push(AuthorField::QuestionExplanation(i));
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.field_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.field_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + order.len() - 1) % order.len()];
    }

    /// Make sure focus still points at an existing field after a row or
    /// block was removed
    pub fn clamp_focus(&mut self) {
        let order = self.field_order();
        if !order.contains(&self.focus) {
            self.focus = *order.last().unwrap_or(&AuthorField::Title);
        }
    }

    /// The text buffer behind the focused field, if it is editable text
    /// (the level and answer selectors are not)
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            AuthorField::Title => Some(&mut self.draft.title),
            AuthorField::Subject => Some(&mut self.draft.subject),
            AuthorField::Level => None,
            AuthorField::Description => Some(&mut self.draft.description),
            AuthorField::Notes => Some(&mut self.draft.notes),
            AuthorField::CardFront(i) => self.draft.cards.get_mut(i).map(|c| &mut c.front),
            AuthorField::CardBack(i) => self.draft.cards.get_mut(i).map(|c| &mut c.back),
            AuthorField::QuestionPrompt(i) => {
                self.draft.questions.get_mut(i).map(|q| &mut q.prompt)
            }
            AuthorField::QuestionChoice(i, c) => self
                .draft
                .questions
                .get_mut(i)
                .and_then(|q| q.choices.get_mut(c)),
            AuthorField::QuestionAnswer(_) => None,
            AuthorField::QuestionExplanation(i) => {
                self.draft.questions.get_mut(i).map(|q| &mut q.explanation)
            }
        }
    }
}

/// Learn view state: the study session plus the notes search box
pub struct LearnView {
    pub session: StudySession,
    /// Live input, applied to `search_query` after the debounce
    pub search_input: String,
    pub search_query: String,
    /// Whether keystrokes go to the search box
    pub searching: bool,
}

pub struct TuiState {
    pub app: App,
    pub view: View,
    pub bus: EventBus,
    pub timers: TimerSet<TimerPurpose>,

    // Library state
    pub entries: Vec<IndexEntry>,
    pub selected: usize,
    pub prompt: Option<LibraryPrompt>,
    pub input_text: String,

    // Per-view session state, created on open and dropped on close
    pub author: Option<AuthorView>,
    pub learn: Option<LearnView>,

    pub flash_message: Option<String>,
    pub quit: bool,
}

impl TuiState {
    pub fn new(app: App) -> Self {
        let mut state = Self {
            app,
            view: View::Library,
            bus: EventBus::new(),
            timers: TimerSet::new(),
            entries: Vec::new(),
            selected: 0,
            prompt: None,
            input_text: String::new(),
            author: None,
            learn: None,
            flash_message: None,
            quit: false,
        };
        state.reload_library();
        state
    }

    // ==================== Router ====================

    /// Drain the event bus and route each event to its view
    pub fn dispatch_events(&mut self) {
        for event in self.bus.drain() {
            match event {
                AppEvent::OpenLearn(id) => self.open_learn(id),
                AppEvent::OpenAuthor(id) => self.open_author(id),
                AppEvent::CapsuleSaved(_) => self.reload_library(),
                AppEvent::AuthorCancelled => self.show_view(View::Library),
            }
        }
    }

    /// Switch the visible view, tearing down the state and timers of
    /// whichever view is being left
    pub fn show_view(&mut self, view: View) {
        if view != View::Learn {
            self.close_learn();
        }
        if view != View::Author {
            self.close_author();
        }
        if view == View::Library {
            self.reload_library();
        }
        self.view = view;
    }

    fn close_learn(&mut self) {
        if self.learn.take().is_some() {
            self.timers.cancel(TimerPurpose::NotesSearch);
            self.timers.cancel(TimerPurpose::QuizReveal);
        }
    }

    fn close_author(&mut self) {
        if self.author.take().is_some() {
            self.timers.cancel(TimerPurpose::Autosave);
        }
    }

    /// Run every timer purpose whose deadline has passed
    pub fn fire_timers(&mut self) {
        for purpose in self.timers.fire() {
            match purpose {
                TimerPurpose::Autosave => self.autosave(),
                TimerPurpose::NotesSearch => {
                    if let Some(learn) = &mut self.learn {
                        learn.search_query = learn.search_input.clone();
                    }
                }
                TimerPurpose::QuizReveal => self.advance_quiz(),
            }
        }
    }

    // ==================== Library ====================

    pub fn reload_library(&mut self) {
        self.entries = self.app.storage.load_index();
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    pub fn selected_entry(&self) -> Option<&IndexEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() && self.selected < self.entries.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn request_delete(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.prompt = Some(LibraryPrompt::ConfirmDelete(entry.id, entry.title.clone()));
        }
    }

    pub fn confirm_delete(&mut self, id: Uuid) {
        match self.app.storage.delete_capsule(id) {
            Ok(()) => self.flash_message = Some("Capsule deleted".to_string()),
            Err(e) => self.flash_message = Some(format!("Delete failed: {}", e)),
        }
        self.reload_library();
    }

    /// Write the selected capsule to `<Title>-<id>.json` in the current
    /// directory
    pub fn export_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let id = entry.id;

        let result = self.app.storage.load_capsule(id).and_then(|capsule| {
            let json = export_json(&self.app.storage, id)?;
            Ok((export_file_name(&capsule), json))
        });

        match result {
            Ok((name, json)) => match fs::write(&name, json) {
                Ok(()) => self.flash_message = Some(format!("Exported to {}", name)),
                Err(e) => self.flash_message = Some(format!("Export failed: {}", e)),
            },
            Err(e) => self.flash_message = Some(format!("Export failed: {}", e)),
        }
    }

    /// Import the capsule JSON file the user typed into the prompt
    pub fn import_from_input(&mut self) {
        let path = self.input_text.trim().to_string();
        self.input_text.clear();
        if path.is_empty() {
            return;
        }

        let result = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))
            .and_then(|text| {
                import_json(&self.app.storage, &text).map_err(|e| format!("Import failed: {}", e))
            });

        match result {
            Ok(id) => {
                self.flash_message = Some("Capsule imported".to_string());
                self.bus.publish(AppEvent::CapsuleSaved(id));
            }
            Err(message) => self.flash_message = Some(message),
        }
    }

    // ==================== Author ====================

    pub fn open_author(&mut self, id: Option<Uuid>) {
        let draft = match id {
            Some(id) => match self.app.storage.load_capsule(id) {
                Ok(capsule) => CapsuleDraft::from_capsule(&capsule),
                Err(e) => {
                    self.flash_message = Some(format!("{}", e));
                    return;
                }
            },
            None => CapsuleDraft::new(),
        };

        self.author = Some(AuthorView::new(draft));
        self.show_view(View::Author);
    }

    /// Mark the draft edited and (re)start the autosave countdown
    pub fn touch_draft(&mut self) {
        if let Some(author) = &mut self.author {
            author.draft.touch();
            author.message = None;
            self.timers.schedule(TimerPurpose::Autosave, AUTOSAVE_DELAY);
        }
    }

    /// Debounced non-final save. Failures are surfaced in the message
    /// line rather than silently dropped.
    fn autosave(&mut self) {
        let Some(author) = &mut self.author else {
            return;
        };
        if !author.draft.is_dirty() {
            return;
        }

        match author.draft.save(&self.app.storage) {
            Ok(id) => {
                author.message = Some(("Auto-saved".to_string(), false));
                self.bus.publish(AppEvent::CapsuleSaved(id));
            }
            Err(e) => {
                author.message = Some((e.to_string(), true));
            }
        }
    }

    /// Explicit save: persists, notifies, stays in the editor
    pub fn save_draft(&mut self) {
        let Some(author) = &mut self.author else {
            return;
        };

        match author.draft.save(&self.app.storage) {
            Ok(id) => {
                author.message = Some(("Saved \u{2713}".to_string(), false));
                self.timers.cancel(TimerPurpose::Autosave);
                self.bus.publish(AppEvent::CapsuleSaved(id));
            }
            Err(e) => {
                author.message = Some((e.to_string(), true));
            }
        }
    }

    /// Discard unsaved edits and notify listeners
    pub fn cancel_author(&mut self) {
        self.bus.publish(AppEvent::AuthorCancelled);
    }

    // ==================== Learn ====================

    pub fn open_learn(&mut self, id: Uuid) {
        match StudySession::open(&self.app.storage, id) {
            Ok(session) => {
                self.learn = Some(LearnView {
                    session,
                    search_input: String::new(),
                    search_query: String::new(),
                    searching: false,
                });
                self.show_view(View::Learn);
            }
            Err(e) => {
                self.flash_message = Some(format!("{}", e));
            }
        }
    }

    /// A keystroke changed the search box; re-apply the filter after the
    /// debounce window
    pub fn touch_search(&mut self) {
        self.timers
            .schedule(TimerPurpose::NotesSearch, NOTES_SEARCH_DEBOUNCE);
    }

    /// Pick a quiz choice; an accepted answer starts the reveal delay
    pub fn answer_quiz(&mut self, choice: usize) {
        if let Some(learn) = &mut self.learn {
            if learn.session.answer(choice) {
                self.timers
                    .schedule(TimerPurpose::QuizReveal, QUIZ_REVEAL_DELAY);
            }
        }
    }

    fn advance_quiz(&mut self) {
        let Some(learn) = &mut self.learn else {
            return;
        };
        if let Err(e) = learn.session.advance_quiz(&self.app.storage) {
            self.flash_message = Some(format!("{}", e));
        }
    }

    pub fn mark_known(&mut self, known: bool) {
        let Some(learn) = &mut self.learn else {
            return;
        };
        if let Err(e) = learn.session.set_known(&self.app.storage, known) {
            self.flash_message = Some(format!("{}", e));
        }
    }
}
