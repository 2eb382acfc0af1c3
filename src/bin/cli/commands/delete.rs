use std::io::Write;

use anyhow::Result;

use crate::app::App;

pub fn run(app: &App, name: &str, yes: bool) -> Result<()> {
    let entry = app.find_capsule(name)?;

    if !yes {
        print!(
            "Delete capsule \"{}\" and its progress? [y/N] ",
            entry.title
        );
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    app.storage.delete_capsule(entry.id)?;
    println!("Deleted \"{}\"", entry.title);

    Ok(())
}
