//! Read access to the snapshot the watcher persists on disk.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::state::{self, NotificationState};

/// Reads the persisted notification snapshot.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: Utf8PathBuf,
}

impl StateStore {
    /// Creates a store backed by the snapshot at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }

    /// Loads the snapshot.
    ///
    /// A missing file yields the zero state. Any other read failure, or
    /// content that does not decode, is returned as an error; the caller
    /// decides what "no usable snapshot" means.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] when the file exists but cannot be read
    /// and [`StoreError::Parse`] when its content is malformed.
    pub fn load(&self) -> Result<NotificationState, StoreError> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(NotificationState::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        state::decode(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Errors raised while loading the persisted snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot exists but could not be read.
    #[error("failed to read state file '{path}': {source}")]
    Read {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The snapshot content is not a valid state document.
    #[error("failed to parse state file '{path}': {source}")]
    Parse {
        /// Snapshot location.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}
