//! Last-value cache kept in the file given by `--tempfile`.

use std::fs;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::metrics::MetricSet;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Values of the last successful cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedValues {
    #[serde(flatten)]
    pub metrics: MetricSet,
    #[serde(rename = "_lastTime")]
    pub last_time: i64,
}

#[derive(Debug, Clone)]
pub struct MetricCache {
    path: PathBuf,
}

impl MetricCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the previous values; a missing file is not an error.
    pub fn load(&self) -> Result<Option<CachedValues>, CacheError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Replace the cache contents atomically.
    pub fn store(&self, metrics: &MetricSet, last_time: i64) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let values = CachedValues {
            metrics: *metrics,
            last_time,
        };
        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer(&mut file, &values).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        file.flush().map_err(io_err)?;
        file.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
