//! Persisted light/dark preference
//!
//! One JSON file holds the preference. It is read once at startup and rewritten through a
//! temporary file plus rename on every change.

use scrubber_core::{ResolvedTheme, ThemeMode, ThemePreference};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum ThemeStoreError {
    #[error("Failed to write theme preference to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize theme preference: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    theme: ThemePreference,
}

pub struct ThemeStore {
    path: PathBuf,
    current: RwLock<ThemePreference>,
}

impl ThemeStore {
    /// Open the store. A missing or unreadable file means "no preference yet".
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let preference = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<ThemeFile>(&content) {
                Ok(file) => file.theme,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring unreadable theme preference file"
                    );
                    ThemePreference::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ThemePreference::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read theme preference file"
                );
                ThemePreference::default()
            }
        };

        tracing::debug!(path = %path.display(), theme = ?preference, "Theme store opened");

        Self {
            path,
            current: RwLock::new(preference),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn preference(&self) -> ThemePreference {
        *self.current.read().await
    }

    /// Resolve the stored preference against the platform scheme, if known.
    pub async fn resolve(&self, system: Option<ThemeMode>) -> ResolvedTheme {
        self.preference().await.resolve(system)
    }

    /// Persist a new preference. The in-memory value only changes once the file is written.
    pub async fn set(&self, preference: ThemePreference) -> Result<(), ThemeStoreError> {
        let mut current = self.current.write().await;

        let body = serde_json::to_string_pretty(&ThemeFile { theme: preference })?;
        let write_err = |source| ThemeStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(write_err)?;

        *current = preference;
        tracing::info!(theme = ?preference, "Theme preference saved");
        Ok(())
    }
}
