use crate::error::StorageError;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk format of the start date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Single-value file holding the last day soda was consumed.
#[derive(Debug, Clone)]
pub struct DateStore {
    data_path: PathBuf,
}

impl DateStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.data_path
    }

    /// Reads the stored date.
    ///
    /// `Ok(None)` means nothing has been stored yet. A file whose content is
    /// not a `YYYY-MM-DD` date yields [`StorageError::Malformed`].
    pub fn load(&self) -> Result<Option<NaiveDate>, StorageError> {
        let bytes = match fs::read(&self.data_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.data_path.clone(),
                    source,
                });
            }
        };

        // Invalid UTF-8 decodes to replacement characters, which never parse.
        let raw = String::from_utf8_lossy(&bytes);
        let content = raw.trim();
        NaiveDate::parse_from_str(content, DATE_FORMAT)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                path: self.data_path.clone(),
                content: content.to_string(),
                source,
            })
    }

    /// Overwrites the file with `date`. The previous value is not kept.
    pub fn save(&self, date: NaiveDate) -> Result<(), StorageError> {
        let write_err = |source: std::io::Error| StorageError::Write {
            path: self.data_path.clone(),
            source,
        };

        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        fs::write(&self.data_path, date.format(DATE_FORMAT).to_string()).map_err(write_err)
    }

    #[cfg(test)]
    pub(crate) fn exists(&self) -> bool {
        self.data_path.exists()
    }
}
