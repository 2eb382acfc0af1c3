use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;

use super::app_state::{TuiState, View};
use super::{author_widget, learn_widget, library_widget, status_bar};

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: visible view + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    let main_area = outer[0];
    let status_area = outer[1];

    match state.view {
        View::Library => library_widget::draw(f, main_area, state),
        View::Author => author_widget::draw(f, main_area, state),
        View::Learn => learn_widget::draw(f, main_area, state),
    }

    status_bar::draw(f, status_area, state);
}
