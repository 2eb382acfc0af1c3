use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &mut TuiState) {
    let block = Block::default()
        .title(" Library ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.entries.is_empty() {
        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No capsules yet.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press n to author a capsule, or i to import a JSON file.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(help_text).block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .entries
        .iter()
        .map(|entry| {
            let title_line = Line::from(vec![
                Span::styled(
                    entry.title.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", entry.level),
                    Style::default().fg(Color::Magenta),
                ),
            ]);

            let subject = if entry.subject.is_empty() {
                "—".to_string()
            } else {
                entry.subject.clone()
            };
            let detail_line = Line::from(Span::styled(
                format!(
                    "  {} \u{2022} updated {}",
                    subject,
                    entry.updated_at.format("%Y-%m-%d")
                ),
                Style::default().fg(Color::DarkGray),
            ));

            let progress_line = Line::from(Span::styled(
                format!(
                    "  quiz best {}%  \u{2022}  known cards {}",
                    entry.best_score, entry.known_count
                ),
                Style::default().fg(Color::Green),
            ));

            ListItem::new(vec![title_line, detail_line, progress_line, Line::from("")])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    f.render_stateful_widget(list, area, &mut list_state);
}
