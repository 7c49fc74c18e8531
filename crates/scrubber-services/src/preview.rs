//! Derived display handles
//!
//! A handle is a revocable reference to the selected image's bytes, served at
//! `/preview/{handle}` so the page can show the image without the bytes ever being
//! written anywhere. Revoked handles resolve to nothing.

use bytes::Bytes;
use scrubber_core::{ImageMime, SelectedImage};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Path the page uses as the `<img>` source.
    pub fn url(&self) -> String {
        format!("/preview/{}", self.0)
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PreviewHandle {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub image_id: Uuid,
    pub mime: ImageMime,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    entries: HashMap<PreviewHandle, PreviewEntry>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, image: &SelectedImage) -> PreviewHandle {
        let handle = PreviewHandle::new();
        self.entries.insert(
            handle,
            PreviewEntry {
                image_id: image.id,
                mime: image.mime.clone(),
                bytes: image.bytes.clone(),
            },
        );
        tracing::debug!(handle = %handle, image_id = %image.id, "Preview handle allocated");
        handle
    }

    /// Returns whether the handle was live.
    pub fn revoke(&mut self, handle: PreviewHandle) -> bool {
        let revoked = self.entries.remove(&handle).is_some();
        if revoked {
            tracing::debug!(handle = %handle, "Preview handle revoked");
        }
        revoked
    }

    pub fn get(&self, handle: &PreviewHandle) -> Option<&PreviewEntry> {
        self.entries.get(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
