//! Asset name resolution against device storage.

use std::io::{self, Read};

/// File extension of every stored asset.
pub const ASSET_EXTENSION: &str = "jpg";

/// Storage the assets live in (flash filesystem on device, a directory on host).
pub trait AssetStore {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Open the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Storage path for an asset name: `/<name>.jpg`.
#[must_use]
pub fn asset_path(name: &str) -> String {
    format!("/{name}.{ASSET_EXTENSION}")
}

/// Resolve an asset name to an existing storage path.
///
/// Empty or absent names and missing files resolve to `None`; the caller
/// skips the draw.
#[must_use]
pub fn resolve_asset<S>(store: &S, name: Option<&str>) -> Option<String>
where
    S: AssetStore + ?Sized,
{
    let name = name.filter(|n| !n.is_empty())?;
    let path = asset_path(name);
    if store.exists(&path) {
        Some(path)
    } else {
        tracing::debug!(%path, "Asset not found in storage");
        None
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Listing(HashSet<&'static str>);

    impl AssetStore for Listing {
        fn exists(&self, path: &str) -> bool {
            self.0.contains(path)
        }

        fn open(&self, _path: &str) -> io::Result<Box<dyn Read + '_>> {
            Ok(Box::new(io::empty()))
        }
    }

    #[test]
    fn test_path_convention() {
        assert_eq!(asset_path("logo"), "/logo.jpg");
    }

    #[test]
    fn test_resolves_existing_asset() {
        let store = Listing(HashSet::from(["/logo.jpg"]));
        assert_eq!(
            resolve_asset(&store, Some("logo")),
            Some("/logo.jpg".to_string())
        );
    }

    #[test]
    fn test_missing_empty_and_absent_names() {
        let store = Listing(HashSet::from(["/.jpg"]));
        assert_eq!(resolve_asset(&store, Some("other")), None);
        assert_eq!(resolve_asset(&store, Some("")), None);
        assert_eq!(resolve_asset(&store, None), None);
    }
}
