use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use classroom_lib::transfer::{export_file_name, export_json};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, name: &str, output: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let entry = app.find_capsule(name)?;
    let capsule = app.storage.load_capsule(entry.id)?;
    let json = export_json(&app.storage, entry.id)?;

    let path: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(export_file_name(&capsule)),
    };

    fs::write(&path, &json).with_context(|| format!("Failed to write {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "id": entry.id.to_string(),
                    "path": path.to_string_lossy(),
                })
            );
        }
        OutputFormat::Plain => {
            println!("Exported \"{}\" to {}", capsule.meta.title, path.display());
        }
    }

    Ok(())
}
