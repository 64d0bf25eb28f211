use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tokio::io::AsyncReadExt;

use super::App;

pub async fn save(app: &App, category: &str, criteria: &str, file: Option<&Path>) -> Result<()> {
    let content = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read the writing from stdin")?;
            buffer
        }
    };

    if content.trim().is_empty() {
        bail!("Nothing to save: the writing is empty");
    }

    let path = app
        .archive
        .save_writing(&content, category, criteria, Utc::now())
        .await?;
    println!("Saved to {}", path.display());
    Ok(())
}
