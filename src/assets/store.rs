//! Resource stores: byte-level access to named fonts and images.
//!
//! Stores answer by logical name, never by path; where a name came from a
//! document it is validated before it touches the filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{InkframeError, InkframeResult};

/// Byte access to named resources. `Ok(None)` means the store is healthy but
/// has no resource of that name; `Err` means the store itself failed.
pub trait ResourceStore {
    fn get_font(&self, name: &str) -> InkframeResult<Option<Vec<u8>>>;
    fn get_image(&self, name: &str) -> InkframeResult<Option<Vec<u8>>>;
}

/// Reject names that could escape a store directory.
pub fn validate_resource_name(name: &str) -> InkframeResult<()> {
    if name.is_empty() {
        return Err(InkframeError::validation("resource name is empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(InkframeError::validation(format!(
            "resource name '{name}' must be a bare file name"
        )));
    }
    Ok(())
}

/// Resources on disk, one directory per resource class.
#[derive(Clone, Debug)]
pub struct DirResourceStore {
    fonts_dir: PathBuf,
    images_dir: PathBuf,
}

impl DirResourceStore {
    pub fn new(fonts_dir: impl Into<PathBuf>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            images_dir: images_dir.into(),
        }
    }

    fn read(dir: &Path, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        validate_resource_name(name)?;
        let path = dir.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InkframeError::source(format!(
                "failed to read resource '{}': {e}",
                path.display()
            ))),
        }
    }
}

impl ResourceStore for DirResourceStore {
    fn get_font(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        Self::read(&self.fonts_dir, name)
    }

    fn get_image(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        Self::read(&self.images_dir, name)
    }
}

/// In-memory store for tests and embedded resources.
#[derive(Clone, Debug, Default)]
pub struct MemoryResourceStore {
    fonts: BTreeMap<String, Vec<u8>>,
    images: BTreeMap<String, Vec<u8>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_font(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.fonts.insert(name.into(), bytes);
    }

    pub fn insert_image(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(name.into(), bytes);
    }
}

impl ResourceStore for MemoryResourceStore {
    fn get_font(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        validate_resource_name(name)?;
        Ok(self.fonts.get(name).cloned())
    }

    fn get_image(&self, name: &str) -> InkframeResult<Option<Vec<u8>>> {
        validate_resource_name(name)?;
        Ok(self.images.get(name).cloned())
    }
}
