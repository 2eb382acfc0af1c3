use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, name: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let entry = app.find_capsule(name)?;
    let capsule = app.storage.load_capsule(entry.id)?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&capsule)?);
        return Ok(());
    }

    let bold = |s: &str| {
        if use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    };

    println!("{}", bold(&capsule.meta.title));
    if !capsule.meta.subject.is_empty() {
        println!("{} \u{2022} {}", capsule.meta.subject, capsule.meta.level);
    } else {
        println!("{}", capsule.meta.level);
    }
    if !capsule.meta.description.is_empty() {
        println!("{}", capsule.meta.description);
    }

    if !capsule.notes.is_empty() {
        println!();
        println!("{}", bold("Notes"));
        for note in &capsule.notes {
            println!("  \u{2022} {}", note);
        }
    }

    if !capsule.flashcards.is_empty() {
        println!();
        println!("{}", bold(&format!("Flashcards ({})", capsule.flashcards.len())));
        for card in &capsule.flashcards {
            println!("  {} \u{2014} {}", card.front, card.back);
        }
    }

    if !capsule.quiz.is_empty() {
        println!();
        println!("{}", bold(&format!("Quiz ({} questions)", capsule.quiz.len())));
        for (i, question) in capsule.quiz.iter().enumerate() {
            println!("  {}. {}", i + 1, question.prompt);
            for (c, choice) in question.choices.iter().enumerate() {
                let marker = if c == question.answer_index { "*" } else { " " };
                println!("    {} {}) {}", marker, (b'A' + c as u8) as char, choice);
            }
        }
    }

    Ok(())
}
