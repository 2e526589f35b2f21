//! Host-side asset stores.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};

use pixel_core::{asset_path, AssetStore};

/// Assets read from a directory, standing in for the device filesystem.
///
/// Storage paths (`/logo.jpg`) are joined under `root`. Paths that would
/// leave `root` are treated as missing.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl AssetStore for DirAssetStore {
    fn exists(&self, path: &str) -> bool {
        self.local_path(path).is_some_and(|p| p.is_file())
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let local = self.local_path(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Invalid asset path: {path}"))
        })?;
        Ok(Box::new(BufReader::new(File::open(local)?)))
    }
}

/// Assets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` at a storage path such as `/logo.jpg`.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Store `bytes` under an asset name, at `/<name>.jpg`.
    pub fn insert_asset(&mut self, name: &str, bytes: Vec<u8>) {
        self.insert(asset_path(name), bytes);
    }
}

impl AssetStore for MemoryAssetStore {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        self.files
            .get(path)
            .map(|bytes| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + '_>)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}
