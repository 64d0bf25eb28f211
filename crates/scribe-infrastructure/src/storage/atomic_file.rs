//! Atomic file operations for single-document storage.
//!
//! Writes go to a temporary file in the same directory which is fsynced and
//! then renamed over the target, so readers never see a partial document.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use scribe_core::ScribeError;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// The document could not be parsed.
    ParseError { format: FileFormat, message: String },
    /// The document could not be serialized.
    SerializeError { format: FileFormat, message: String },
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::ParseError { format, message } => {
                write!(f, "{:?} parse error: {}", format, message)
            }
            AtomicFileError::SerializeError { format, message } => {
                write!(f, "{:?} serialization error: {}", format, message)
            }
            AtomicFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<AtomicFileError> for ScribeError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::IoError(e) => e.into(),
            AtomicFileError::ParseError { format, message }
            | AtomicFileError::SerializeError { format, message } => ScribeError::Serialization {
                format: format!("{:?}", format).to_uppercase(),
                message,
            },
            AtomicFileError::LockError(message) => ScribeError::persistence(message),
        }
    }
}

/// A handle to a document stored in a single file.
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            format: self.format,
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// - `Ok(Some(T))`: Successfully loaded
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        self.parse(&content).map(Some)
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = self.serialize(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(serialized.as_bytes())?;

        // Ensure data is written to disk before the rename makes it visible
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Read-modify-write under an exclusive file lock.
    ///
    /// `default_value` is used when the file doesn't exist yet.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T, AtomicFileError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)?;

        Ok(data)
    }

    /// Moves the current file aside as `<name>.corrupt` so it can be inspected.
    pub fn quarantine(&self) -> Result<PathBuf, AtomicFileError> {
        let file_name = self.file_name()?;
        let target = self
            .path
            .with_file_name(format!("{}.corrupt", file_name));
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn parse(&self, content: &str) -> Result<T, AtomicFileError> {
        let parsed = match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| AtomicFileError::ParseError {
            format: self.format,
            message,
        })
    }

    fn serialize(&self, data: &T) -> Result<String, AtomicFileError> {
        let serialized = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::to_string_pretty(data).map_err(|e| e.to_string()),
        };
        serialized.map_err(|message| AtomicFileError::SerializeError {
            format: self.format,
            message,
        })
    }

    fn file_name(&self) -> Result<String, AtomicFileError> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AtomicFileError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Path has no file name",
                ))
            })
    }

    /// Temporary file path next to the target, so the rename stays on one filesystem.
    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let file_name = self.file_name()?;
        Ok(self.path.with_file_name(format!(".{}.tmp", file_name)))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicFileError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock happens when the handle closes; the lock file itself is best effort
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn counter(count: u32) -> Counter {
        Counter {
            name: "test".to_string(),
            count,
        }
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(temp_dir.path().join("c.json"), FileFormat::Json);

        file.save(&counter(42)).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter(42)));
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(temp_dir.path().join("c.toml"), FileFormat::Toml);

        file.save(&counter(7)).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter(7)));
    }

    #[test]
    fn test_load_missing_and_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.json");
        let file = AtomicFile::<Counter>::new(path.clone(), FileFormat::Json);
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.json");
        fs::write(&path, "{ not json").unwrap();
        let file = AtomicFile::<Counter>::new(path, FileFormat::Json);

        let err = file.load().unwrap_err();
        assert!(matches!(err, AtomicFileError::ParseError { format: FileFormat::Json, .. }));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("c.json");
        let file = AtomicFile::<Counter>::new(path.clone(), FileFormat::Json);

        file.save(&counter(1)).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".c.json.tmp").exists());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Counter>::new(temp_dir.path().join("c.toml"), FileFormat::Toml);

        file.update(counter(0), |c| c.count += 10).unwrap();
        let updated = file.update(counter(0), |c| c.count += 5).unwrap();

        assert_eq!(updated.count, 15);
        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(!temp_dir.path().join("c.lock").exists());
    }

    #[test]
    fn test_quarantine() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.json");
        fs::write(&path, "garbage").unwrap();
        let file = AtomicFile::<Counter>::new(path.clone(), FileFormat::Json);

        let moved = file.quarantine().unwrap();

        assert!(!path.exists());
        assert_eq!(moved, temp_dir.path().join("c.json.corrupt"));
        assert_eq!(fs::read_to_string(moved).unwrap(), "garbage");
    }
}
