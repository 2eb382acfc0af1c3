use anyhow::{bail, Result};

use classroom_lib::storage::{Capsule, Level};

use crate::app::App;
use crate::OutputFormat;

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "beginner" => Ok(Level::Beginner),
        "intermediate" => Ok(Level::Intermediate),
        "advanced" => Ok(Level::Advanced),
        other => bail!(
            "Unknown level '{}'. Expected beginner, intermediate, or advanced.",
            other
        ),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    app: &App,
    title: &str,
    subject: Option<&str>,
    level: Option<&str>,
    description: Option<&str>,
    notes: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let mut capsule = Capsule::new(title.to_string());

    if let Some(subject) = subject {
        capsule.meta.subject = subject.to_string();
    }
    if let Some(level) = level {
        capsule.meta.level = parse_level(level)?;
    }
    if let Some(description) = description {
        capsule.meta.description = description.to_string();
    }
    if let Some(notes) = notes {
        capsule.notes = notes
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
    }

    let id = app.storage.save_capsule(&mut capsule)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": id.to_string(),
                    "title": capsule.meta.title,
                })
            );
        }
        OutputFormat::Plain => {
            println!("Created capsule \"{}\" ({})", capsule.meta.title, id);
        }
    }

    Ok(())
}
