use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let entries = app.storage.load_index();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("No capsules yet. Create one with `classroom new` or import a JSON file.");
                return Ok(());
            }

            for entry in &entries {
                let title = if use_color {
                    format!("\x1b[1m{}\x1b[0m", entry.title)
                } else {
                    entry.title.clone()
                };
                let subject = if entry.subject.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", entry.subject)
                };
                println!("{}{} [{}]", title, subject, entry.level);
                println!(
                    "    updated {}  best {}%  known {}",
                    entry.updated_at.format("%Y-%m-%d"),
                    entry.best_score,
                    entry.known_count
                );
            }
        }
    }

    Ok(())
}
