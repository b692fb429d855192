use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const SESSION_FORMAT_VERSION: u16 = 1;
pub const SESSION_FILE_NAME: &str = "session.json";

/// Which level is current. Index 0 means nothing has been loaded yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSession {
    current_index: u32,
}

impl LevelSession {
    pub const FIRST_LEVEL: u32 = 1;

    pub fn at(current_index: u32) -> Self {
        Self { current_index }
    }

    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    pub fn has_level(&self) -> bool {
        self.current_index >= Self::FIRST_LEVEL
    }

    /// Moves to the next index and returns it.
    pub fn advance(&mut self) -> u32 {
        self.current_index = self.current_index.saturating_add(1);
        self.current_index
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("session file {path} has unsupported version {found} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u16,
        expected: u16,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFileV1 {
    version: u16,
    level_index: u32,
}

/// Persists a [`LevelSession`] as a small JSON document.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_cache_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session has been saved yet.
    pub fn load(&self) -> Result<Option<LevelSession>, SessionStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "session_file_missing");
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionStoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let parsed = serde_json::from_str::<SessionFileV1>(&raw).map_err(|source| {
            SessionStoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        if parsed.version != SESSION_FORMAT_VERSION {
            return Err(SessionStoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: parsed.version,
                expected: SESSION_FORMAT_VERSION,
            });
        }
        Ok(Some(LevelSession::at(parsed.level_index)))
    }

    pub fn save(&self, session: &LevelSession) -> Result<(), SessionStoreError> {
        let file = SessionFileV1 {
            version: SESSION_FORMAT_VERSION,
            level_index: session.current_index(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(|source| {
            SessionStoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        replace_file_contents(&self.path, &text).map_err(|source| SessionStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            level_index = session.current_index(),
            "session_saved"
        );
        Ok(())
    }
}

/// Writes next to the target first so readers never see a half-written file.
fn replace_file_contents(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(SESSION_FILE_NAME);
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, text)?;

    match fs::remove_file(path) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(error);
        }
    }
    fs::rename(&tmp_path, path).map_err(|error| {
        let _ = fs::remove_file(&tmp_path);
        error
    })
}
