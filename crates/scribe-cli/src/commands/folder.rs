use std::path::Path;

use anyhow::Result;

use super::App;

pub async fn set(app: &App, path: &Path) -> Result<()> {
    let folder = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    app.rotation.select_folder(&folder).await?;

    println!("Prompt folder: {}", folder.display());
    warn_if_unsaved(app);
    Ok(())
}

pub async fn show(app: &App) -> Result<()> {
    match app.rotation.selected_folder().await {
        Some(folder) => println!("{}", folder),
        None => println!("No prompt folder selected. Use `scribe folder set <PATH>`."),
    }
    Ok(())
}

pub(crate) fn warn_if_unsaved(app: &App) {
    if !app.rotation.persistence_healthy() {
        eprintln!("Warning: history could not be saved; it will be lost when scribe exits.");
    }
}
