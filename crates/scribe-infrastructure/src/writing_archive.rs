//! Saves finished writings as text files.
//!
//! File names record when the piece was written and which prompt category
//! and feedback criteria it was written for:
//! `2024-05-01T09-30-00-000Z_WritingPrompts_fantasy_clarity.txt`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use scribe_core::error::Result;

use crate::paths::ScribePaths;

pub struct WritingArchive {
    dir: PathBuf,
}

impl WritingArchive {
    pub fn new(paths: &ScribePaths) -> Result<Self> {
        Ok(Self::with_dir(paths.writings_dir()?))
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes `content` to a new file and returns its path.
    pub async fn save_writing(
        &self,
        content: &str,
        category: &str,
        criteria: &str,
        written_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let mut copy = 1;
        let (path, mut file) = loop {
            let path = self.dir.join(file_name(category, criteria, written_at, copy));
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && copy < MAX_COPIES => {
                    copy += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        tracing::info!("[WritingArchive] Saved writing to {:?}", path);
        Ok(path)
    }
}

/// Same-name saves get `_2`, `_3`, ... up to this many files.
const MAX_COPIES: u32 = 1000;

fn file_name(category: &str, criteria: &str, written_at: DateTime<Utc>, copy: u32) -> String {
    let suffix = if copy > 1 {
        format!("_{}", copy)
    } else {
        String::new()
    };
    format!(
        "{}_WritingPrompts_{}_{}{}.txt",
        written_at.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        sanitize(category),
        sanitize(criteria),
        suffix
    )
}

/// Keeps file names portable: anything but letters, digits, `-` and `_` becomes `-`.
fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}
