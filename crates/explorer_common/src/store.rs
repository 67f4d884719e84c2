//! Local transcript store.
//!
//! Append-only: files are opened with `create_new`, so an existing transcript
//! is never overwritten. A taken name gets a `_2`, `_3`, ... suffix before the
//! extension.

use explorer_shared::persist::TranscriptSink;
use explorer_shared::PersistenceError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Suffixes tried before giving up on a name.
const MAX_SUFFIX: usize = 100;

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, path_hint: &str) -> Result<PathBuf, PersistenceError> {
        // hints are bare file names; anything else would escape the store
        match Path::new(path_hint).file_name() {
            Some(name) if name == path_hint => Ok(self.dir.join(name)),
            _ => Err(PersistenceError::Write {
                path: self.dir.join(path_hint),
                reason: "path hint must be a plain file name".to_string(),
            }),
        }
    }
}

/// `name` with `_n` inserted before the extension.
fn suffixed(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", name, n),
    }
}

impl TranscriptSink for LocalStore {
    fn persist(&self, path_hint: &str, content: &[u8]) -> Result<PathBuf, PersistenceError> {
        let first = self.target(path_hint)?;
        let fail_at = |path: &Path, e: std::io::Error| PersistenceError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).map_err(|e| fail_at(&self.dir, e))?;

        let mut path = first.clone();
        let mut n = 1;
        let mut file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists && n < MAX_SUFFIX => {
                    n += 1;
                    path = self.dir.join(suffixed(path_hint, n));
                    tracing::debug!(taken = %first.display(), next = %path.display(), "name taken");
                }
                Err(e) => return Err(fail_at(&path, e)),
            }
        };
        let write_err = |e: std::io::Error| fail_at(&path, e);
        file.write_all(content).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "file written");
        Ok(path)
    }
}
