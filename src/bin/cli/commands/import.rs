use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use classroom_lib::transfer::import_json;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, file: &Path, format: &OutputFormat) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let id = import_json(&app.storage, &text)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let capsule = app.storage.load_capsule(id)?;

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
            println!("Imported \"{}\" ({})", capsule.meta.title, id);
        }
    }

    Ok(())
}
