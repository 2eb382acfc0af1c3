use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use classroom_lib::events::AppEvent;
use classroom_lib::study::{QuizStage, Subview};

use super::app_state::{AuthorField, LibraryPrompt, TuiState, View};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.view {
        View::Library => handle_library_key(state, key),
        View::Author => handle_author_key(state, key),
        View::Learn => handle_learn_key(state, key),
    }
}

// ==================== Library ====================

fn handle_library_key(state: &mut TuiState, key: KeyEvent) {
    match state.prompt.take() {
        Some(LibraryPrompt::ConfirmDelete(id, _)) => {
            // Anything but y keeps the capsule
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                state.confirm_delete(id);
            }
            return;
        }
        Some(LibraryPrompt::ImportPath) => {
            match key.code {
                KeyCode::Esc => {
                    state.input_text.clear();
                }
                KeyCode::Enter => {
                    state.import_from_input();
                }
                KeyCode::Backspace => {
                    state.input_text.pop();
                    state.prompt = Some(LibraryPrompt::ImportPath);
                }
                KeyCode::Char(c) => {
                    state.input_text.push(c);
                    state.prompt = Some(LibraryPrompt::ImportPath);
                }
                _ => {
                    state.prompt = Some(LibraryPrompt::ImportPath);
                }
            }
            return;
        }
        None => {}
    }

    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
        KeyCode::Enter | KeyCode::Char('l') => {
            if let Some(entry) = state.selected_entry() {
                state.bus.publish(AppEvent::OpenLearn(entry.id));
            }
        }
        KeyCode::Char('e') => {
            if let Some(entry) = state.selected_entry() {
                state.bus.publish(AppEvent::OpenAuthor(Some(entry.id)));
            }
        }
        KeyCode::Char('n') => {
            state.bus.publish(AppEvent::OpenAuthor(None));
        }
        KeyCode::Char('x') => state.export_selected(),
        KeyCode::Char('i') => {
            state.input_text.clear();
            state.prompt = Some(LibraryPrompt::ImportPath);
        }
        KeyCode::Char('d') => state.request_delete(),
        _ => {}
    }
}

// ==================== Author ====================

fn handle_author_key(state: &mut TuiState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => state.save_draft(),
            KeyCode::Char('n') => add_card(state),
            KeyCode::Char('q') => add_question(state),
            KeyCode::Char('d') => remove_focused_row(state),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => state.cancel_author(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(author) = &mut state.author {
                author.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(author) = &mut state.author {
                author.focus_prev();
            }
        }
        KeyCode::Left => cycle_selector(state, false),
        KeyCode::Right => cycle_selector(state, true),
        KeyCode::Enter => {
            // Newline inside the notes area, next field everywhere else
            let mut advance = false;
            if let Some(author) = &mut state.author {
                if author.focus == AuthorField::Notes {
                    author.draft.notes.push('\n');
                } else {
                    advance = true;
                }
            }
            if advance {
                if let Some(author) = &mut state.author {
                    author.focus_next();
                }
            } else {
                state.touch_draft();
            }
        }
        KeyCode::Backspace => edit_focused_text(state, |text| {
            text.pop();
        }),
        KeyCode::Char(c) => edit_focused_text(state, |text| text.push(c)),
        _ => {}
    }
}

/// Apply an edit to the focused text field, then restart the autosave
/// countdown
fn edit_focused_text(state: &mut TuiState, edit: impl FnOnce(&mut String)) {
    let mut edited = false;
    if let Some(author) = &mut state.author {
        if let Some(text) = author.focused_text_mut() {
            edit(text);
            edited = true;
        }
    }
    if edited {
        state.touch_draft();
    }
}

/// Left/Right on the level and correct-answer selectors
fn cycle_selector(state: &mut TuiState, forward: bool) {
    let mut changed = false;
    if let Some(author) = &mut state.author {
        match author.focus {
            AuthorField::Level => {
                author.draft.level = if forward {
                    author.draft.level.next()
                } else {
                    author.draft.level.prev()
                };
                changed = true;
            }
            AuthorField::QuestionAnswer(i) => {
                if let Some(question) = author.draft.questions.get_mut(i) {
                    question.answer_index = if forward {
                        (question.answer_index + 1) % 4
                    } else {
                        (question.answer_index + 3) % 4
                    };
                    changed = true;
                }
            }
            _ => {}
        }
    }
    if changed {
        state.touch_draft();
    }
}

fn add_card(state: &mut TuiState) {
    if let Some(author) = &mut state.author {
        author.draft.add_card();
        author.focus = AuthorField::CardFront(author.draft.cards.len() - 1);
    }
    state.touch_draft();
}

fn add_question(state: &mut TuiState) {
    if let Some(author) = &mut state.author {
        author.draft.add_question();
        author.focus = AuthorField::QuestionPrompt(author.draft.questions.len() - 1);
    }
    state.touch_draft();
}

/// Remove the card row or question block the focus is inside
fn remove_focused_row(state: &mut TuiState) {
    let mut removed = false;
    if let Some(author) = &mut state.author {
        match author.focus {
            AuthorField::CardFront(i) | AuthorField::CardBack(i) => {
                author.draft.remove_card(i);
                removed = true;
            }
            AuthorField::QuestionPrompt(i)
            | AuthorField::QuestionChoice(i, _)
            | AuthorField::QuestionAnswer(i)
            | AuthorField::QuestionExplanation(i) => {
                author.draft.remove_question(i);
                removed = true;
            }
            _ => {}
        }
        if removed {
            author.clamp_focus();
        }
    }
    if removed {
        state.touch_draft();
    }
}

// ==================== Learn ====================

fn handle_learn_key(state: &mut TuiState, key: KeyEvent) {
    let searching = state.learn.as_ref().map(|l| l.searching).unwrap_or(false);

    if searching {
        // Keystrokes go to the notes search box
        if let Some(learn) = &mut state.learn {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    learn.searching = false;
                    learn.search_query = learn.search_input.clone();
                }
                KeyCode::Backspace => {
                    learn.search_input.pop();
                    state.touch_search();
                }
                KeyCode::Char(c) => {
                    learn.search_input.push(c);
                    state.touch_search();
                }
                _ => {}
            }
        }
        return;
    }

    let subview = state.learn.as_ref().map(|l| l.session.subview);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.show_view(View::Library),
        KeyCode::Char('[') => {
            if let Some(learn) = &mut state.learn {
                learn.session.cycle(false);
            }
        }
        KeyCode::Char(']') | KeyCode::Tab => {
            if let Some(learn) = &mut state.learn {
                learn.session.cycle(true);
            }
        }
        KeyCode::Char('/') if subview == Some(Subview::Notes) => {
            if let Some(learn) = &mut state.learn {
                learn.searching = true;
            }
        }
        KeyCode::Char(' ') if subview == Some(Subview::Flashcards) => {
            if let Some(learn) = &mut state.learn {
                learn.session.flip();
            }
        }
        KeyCode::Left | KeyCode::Char('h') if subview == Some(Subview::Flashcards) => {
            if let Some(learn) = &mut state.learn {
                learn.session.prev_card();
            }
        }
        KeyCode::Right | KeyCode::Char('l') if subview == Some(Subview::Flashcards) => {
            if let Some(learn) = &mut state.learn {
                learn.session.next_card();
            }
        }
        KeyCode::Char('m') if subview == Some(Subview::Flashcards) => state.mark_known(true),
        KeyCode::Char('u') if subview == Some(Subview::Flashcards) => state.mark_known(false),
        KeyCode::Char(c @ '1'..='4') if subview == Some(Subview::Quiz) => {
            state.answer_quiz(c as usize - '1' as usize);
        }
        KeyCode::Enter | KeyCode::Char('n') if subview == Some(Subview::Quiz) => {
            if let Some(learn) = &mut state.learn {
                if matches!(learn.session.quiz_stage(), QuizStage::Finished { .. }) {
                    learn.session.show(Subview::Notes);
                }
            }
        }
        _ => {}
    }
}
