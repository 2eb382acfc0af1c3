use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::app_state::{AuthorField, TuiState};

const CURSOR: &str = "\u{258c}";

/// Label + editable value on one line, highlighted when focused
fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let value_span = if focused {
        Span::styled(
            format!("{}{}", value, CURSOR),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    } else {
        Span::styled(value.to_string(), Style::default().fg(Color::White))
    };

    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(Color::Cyan)),
        value_span,
    ])
}

/// A Left/Right selector such as the level or the correct answer
fn selector_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!("\u{25c2} {} \u{25b8}", value)
    } else {
        value.to_string()
    };
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(format!("{:<13}", label), Style::default().fg(Color::Cyan)),
        Span::styled(text, style),
    ])
}

fn section_line(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn draw(f: &mut Frame, area: Rect, state: &mut TuiState) {
    let Some(author) = &mut state.author else {
        return;
    };

    let title = if author.draft.title.trim().is_empty() {
        " Author \u{2014} New Capsule ".to_string()
    } else {
        format!(" Author \u{2014} {} ", author.draft.title.trim())
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Form body + one message line under it
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(block.inner(area));
    let form_area = rows[0];
    let message_area = rows[1];

    f.render_widget(block, area);

    let focus = author.focus;
    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0usize;
    let mut mark = |lines: &mut Vec<Line>, here: bool| {
        if here {
            focused_line = lines.len().saturating_sub(1);
        }
    };

    // Metadata
    lines.push(field_line(
        "Title *",
        &author.draft.title,
        focus == AuthorField::Title,
    ));
    mark(&mut lines, focus == AuthorField::Title);
    lines.push(field_line(
        "Subject",
        &author.draft.subject,
        focus == AuthorField::Subject,
    ));
    mark(&mut lines, focus == AuthorField::Subject);
    lines.push(selector_line(
        "Level",
        author.draft.level.as_str(),
        focus == AuthorField::Level,
    ));
    mark(&mut lines, focus == AuthorField::Level);
    lines.push(field_line(
        "Description",
        &author.draft.description,
        focus == AuthorField::Description,
    ));
    mark(&mut lines, focus == AuthorField::Description);

    // Notes
    lines.push(Line::from(""));
    lines.push(section_line("Notes (one per line)".to_string()));
    let notes_focused = focus == AuthorField::Notes;
    let note_lines: Vec<&str> = author.draft.notes.split('\n').collect();
    for (i, note) in note_lines.iter().enumerate() {
        let is_last = i == note_lines.len() - 1;
        let text = if notes_focused && is_last {
            format!("  {}{}", note, CURSOR)
        } else {
            format!("  {}", note)
        };
        let style = if notes_focused {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(text, style)));
        mark(&mut lines, notes_focused && is_last);
    }

    // Flashcards
    lines.push(Line::from(""));
    lines.push(section_line(format!(
        "Flashcards ({})  \u{2014} Ctrl+N adds a card",
        author.draft.cards.len()
    )));
    for (i, card) in author.draft.cards.iter().enumerate() {
        lines.push(field_line(
            &format!("  {}. Front", i + 1),
            &card.front,
            focus == AuthorField::CardFront(i),
        ));
        mark(&mut lines, focus == AuthorField::CardFront(i));
        lines.push(field_line(
            "     Back",
            &card.back,
            focus == AuthorField::CardBack(i),
        ));
        mark(&mut lines, focus == AuthorField::CardBack(i));
    }

    // Quiz
    lines.push(Line::from(""));
    lines.push(section_line(format!(
        "Quiz ({})  \u{2014} Ctrl+Q adds a question",
        author.draft.questions.len()
    )));
    for (i, question) in author.draft.questions.iter().enumerate() {
        lines.push(field_line(
            &format!("  Q{}", i + 1),
            &question.prompt,
            focus == AuthorField::QuestionPrompt(i),
        ));
        mark(&mut lines, focus == AuthorField::QuestionPrompt(i));

        for (c, choice) in question.choices.iter().enumerate() {
            let label = format!("     {})", (b'A' + c as u8) as char);
            lines.push(field_line(
                &label,
                choice,
                focus == AuthorField::QuestionChoice(i, c),
            ));
            mark(&mut lines, focus == AuthorField::QuestionChoice(i, c));
        }

        let answer = format!("{}", (b'A' + question.answer_index.min(3) as u8) as char);
        lines.push(selector_line(
            "     Correct",
            &answer,
            focus == AuthorField::QuestionAnswer(i),
        ));
        mark(&mut lines, focus == AuthorField::QuestionAnswer(i));

        lines.push(field_line(
            "     Explain",
            &question.explanation,
            focus == AuthorField::QuestionExplanation(i),
        ));
        mark(&mut lines, focus == AuthorField::QuestionExplanation(i));
    }

    // Keep the focused line visible
    let visible = form_area.height as usize;
    if visible > 0 {
        if focused_line < author.scroll {
            author.scroll = focused_line;
        } else if focused_line >= author.scroll + visible {
            author.scroll = focused_line + 1 - visible;
        }
    }

    let form = Paragraph::new(lines).scroll((author.scroll as u16, 0));
    f.render_widget(form, form_area);

    // Message line: validation errors in red, save notices dimmed
    if let Some((text, is_error)) = &author.message {
        let style = if *is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled(text.clone(), style)),
            message_area,
        );
    }
}
