use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use classroom_lib::study::Subview;

use super::app_state::{LibraryPrompt, TuiState, View};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    // Library prompts take over the status line
    match &state.prompt {
        Some(LibraryPrompt::ConfirmDelete(_, title)) => {
            let text = format!(" Delete \"{}\" and its progress? y/N ", title);
            let prompt = Paragraph::new(text).style(Style::default().bg(Color::Red).fg(Color::White));
            f.render_widget(prompt, area);
            return;
        }
        Some(LibraryPrompt::ImportPath) => {
            let text = format!(" Import JSON file: {}\u{2588}", state.input_text);
            let prompt =
                Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White));
            f.render_widget(prompt, area);
            return;
        }
        None => {}
    }

    let hints = match state.view {
        View::Library => {
            " Enter: learn  e: edit  n: new  i: import  x: export  d: delete  j/k: move  q: quit "
        }
        View::Author => {
            " Tab: next field  Ctrl+S: save  Ctrl+N: add card  Ctrl+Q: add question  Ctrl+D: remove  Esc: cancel "
        }
        View::Learn => {
            let subview = state.learn.as_ref().map(|l| l.session.subview);
            match subview {
                Some(Subview::Flashcards) => {
                    " [/]: tabs  Space: flip  \u{2190}/\u{2192}: cards  m/u: known  q: back "
                }
                Some(Subview::Quiz) => " [/]: tabs  1-4: answer  q: back ",
                _ => " [/]: tabs  /: search notes  q: back ",
            }
        }
    };

    let status = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
