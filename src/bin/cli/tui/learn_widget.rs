use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use classroom_lib::study::{QuizStage, Subview};

use super::app_state::{LearnView, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &mut TuiState) {
    let Some(learn) = &state.learn else {
        return;
    };

    let block = Block::default()
        .title(format!(" Learn \u{2014} {} ", learn.session.capsule().meta.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    draw_header(f, rows[0], learn);
    draw_tabs(f, rows[1], learn);

    match learn.session.subview {
        Subview::Notes => draw_notes(f, rows[2], learn),
        Subview::Flashcards => draw_flashcards(f, rows[2], learn),
        Subview::Quiz => draw_quiz(f, rows[2], learn),
    }
}

fn draw_header(f: &mut Frame, area: Rect, learn: &LearnView) {
    let meta = &learn.session.capsule().meta;

    let subject_line = if meta.subject.is_empty() {
        meta.level.to_string()
    } else {
        format!("{} \u{2022} {}", meta.subject, meta.level)
    };
    let description = if meta.description.is_empty() {
        "No description available.".to_string()
    } else {
        meta.description.clone()
    };

    let lines = vec![
        Line::from(Span::styled(
            subject_line,
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_tabs(f: &mut Frame, area: Rect, learn: &LearnView) {
    let tab = |name: &str, subview: Subview| {
        if learn.session.subview == subview {
            Span::styled(
                format!(" {} ", name),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", name), Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        tab("Notes", Subview::Notes),
        Span::raw(" "),
        tab("Flashcards", Subview::Flashcards),
        Span::raw(" "),
        tab("Quiz", Subview::Quiz),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_notes(f: &mut Frame, area: Rect, learn: &LearnView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let search_text = if learn.searching {
        format!("/{}\u{258c}", learn.search_input)
    } else if learn.search_input.is_empty() {
        "/ (press / to search)".to_string()
    } else {
        format!("/{}", learn.search_input)
    };
    let search_style = if learn.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(Span::styled(search_text, search_style)),
        rows[0],
    );

    if learn.session.capsule().notes.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No notes available",
                Style::default().fg(Color::DarkGray),
            )),
            rows[1],
        );
        return;
    }

    let matches = learn.session.filtered_notes(&learn.search_query);
    if matches.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No matching notes",
                Style::default().fg(Color::DarkGray),
            )),
            rows[1],
        );
        return;
    }

    let items: Vec<ListItem> = matches
        .iter()
        .map(|note| ListItem::new(format!("\u{2022} {}", note)))
        .collect();
    f.render_widget(List::new(items), rows[1]);
}

fn draw_flashcards(f: &mut Frame, area: Rect, learn: &LearnView) {
    let session = &learn.session;

    if session.card_count() == 0 {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No flashcards",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let known_marker = if session.current_card_known() {
        "  \u{2713} known"
    } else {
        ""
    };
    f.render_widget(
        Paragraph::new(format!(
            "{} / {}   Known: {}{}",
            session.card_index() + 1,
            session.card_count(),
            session.known_count(),
            known_marker
        )),
        rows[0],
    );

    let (side, text) = match session.current_card() {
        Some(card) if session.is_flipped() => ("Back", card.back.clone()),
        Some(card) => ("Front", card.front.clone()),
        None => ("Front", String::new()),
    };

    let card_block = Block::default()
        .title(format!(" {} ", side))
        .borders(Borders::ALL)
        .border_style(if session.is_flipped() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Yellow)
        });
    f.render_widget(
        Paragraph::new(text)
            .block(card_block)
            .wrap(Wrap { trim: false }),
        rows[1],
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            "Space: flip   \u{2190}/\u{2192}: previous/next   m: known   u: unknown",
            Style::default().fg(Color::DarkGray),
        )),
        rows[2],
    );
}

fn draw_quiz(f: &mut Frame, area: Rect, learn: &LearnView) {
    let session = &learn.session;

    if session.quiz_len() == 0 {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No quiz questions available",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    if let QuizStage::Finished { score } = session.quiz_stage() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Your score: {}%", score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Correct: {} / {}",
                session.quiz_correct(),
                session.quiz_len()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to go back to the notes",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let Some(question) = session.current_question() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Question {} / {}",
                session.quiz_index() + 1,
                session.quiz_len()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(question.prompt.clone()),
        Line::from(""),
    ];

    let revealed = match session.quiz_stage() {
        QuizStage::Revealed { selected } => Some(selected),
        _ => None,
    };

    for (c, choice) in question.choices.iter().enumerate() {
        let label = format!("  {}. {}", c + 1, choice);
        let style = match revealed {
            // After answering: the correct choice is green, a wrong pick red
            Some(_) if c == question.answer_index => Style::default().fg(Color::Green),
            Some(selected) if c == selected => Style::default().fg(Color::Red),
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default().fg(Color::White),
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    if revealed.is_some() {
        if let Some(explanation) = &question.explanation {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                explanation.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press 1-4 to answer",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
