//! Image lookup by external id.
//!
//! Images are plain files named `{external_id}-{slot}.{ext}`. Slot 1 is the
//! card thumbnail; slots 1..=N make up the detail gallery. For each slot the
//! configured extensions are tried in order and the first present file wins.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ImagesConfig;

/// Slot used for catalog cards.
pub const THUMBNAIL_SLOT: u8 = 1;

/// Something that can tell whether an asset file exists.
pub trait AssetListing: Send + Sync {
    fn contains(&self, name: &str) -> bool;
}

/// Assets stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetListing for DirectoryAssets {
    fn contains(&self, name: &str) -> bool {
        // Names come from external ids; never let them walk out of the root
        if name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return false;
        }
        self.root.join(name).is_file()
    }
}

/// Fixed set of asset names, for tests and embedded asset bundles.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    names: HashSet<String>,
}

impl StaticAssets {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetListing for StaticAssets {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Resolves image file names for catalog entries.
#[derive(Clone)]
pub struct ImageResolver {
    assets: Arc<dyn AssetListing>,
    extensions: Vec<String>,
    gallery_slots: u8,
}

impl ImageResolver {
    pub fn new(assets: Arc<dyn AssetListing>, extensions: Vec<String>, gallery_slots: u8) -> Self {
        Self {
            assets,
            extensions,
            gallery_slots,
        }
    }

    /// Build a resolver over the configured image directory.
    pub fn from_config(config: &ImagesConfig) -> Self {
        Self::new(
            Arc::new(DirectoryAssets::new(config.dir.clone())),
            config.extensions.clone(),
            config.gallery_slots,
        )
    }

    /// First existing `{external_id}-{slot}.{ext}`, if any.
    pub fn resolve_image(&self, external_id: &str, slot: u8) -> Option<String> {
        if external_id.is_empty() || slot == 0 {
            return None;
        }
        self.extensions
            .iter()
            .map(|ext| format!("{}-{}.{}", external_id, slot, ext))
            .find(|name| self.assets.contains(name))
    }

    pub fn thumbnail(&self, external_id: &str) -> Option<String> {
        self.resolve_image(external_id, THUMBNAIL_SLOT)
    }

    /// Resolved images for slots `1..=gallery_slots`, missing slots skipped.
    pub fn gallery(&self, external_id: &str) -> Vec<String> {
        (1..=self.gallery_slots)
            .filter_map(|slot| self.resolve_image(external_id, slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(names: &[&str]) -> ImageResolver {
        ImageResolver::new(
            Arc::new(StaticAssets::new(names.iter().copied())),
            vec![
                "svg".to_string(),
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
            ],
            3,
        )
    }

    #[test]
    fn test_missing_image_is_none() {
        let resolver = resolver(&[]);
        assert_eq!(resolver.resolve_image("nonexistent-medicine", 1), None);
    }

    #[test]
    fn test_prefers_svg_over_png() {
        let resolver = resolver(&["med1-1.png", "med1-1.svg"]);
        assert_eq!(resolver.thumbnail("med1"), Some("med1-1.svg".to_string()));
    }

    #[test]
    fn test_falls_back_through_raster_formats() {
        let resolver = resolver(&["med1-1.jpeg"]);
        assert_eq!(resolver.thumbnail("med1"), Some("med1-1.jpeg".to_string()));
    }

    #[test]
    fn test_empty_id_and_zero_slot() {
        let resolver = resolver(&["-1.png", "med1-0.png"]);
        assert_eq!(resolver.resolve_image("", 1), None);
        assert_eq!(resolver.resolve_image("med1", 0), None);
    }

    #[test]
    fn test_special_characters_in_id() {
        let resolver = resolver(&["test_medicine-123-1.png"]);
        assert_eq!(
            resolver.thumbnail("test_medicine-123"),
            Some("test_medicine-123-1.png".to_string())
        );
    }

    #[test]
    fn test_gallery_skips_missing_slots() {
        let resolver = resolver(&["med1-1.svg", "med1-3.jpg", "med1-4.png"]);
        assert_eq!(
            resolver.gallery("med1"),
            vec!["med1-1.svg".to_string(), "med1-3.jpg".to_string()]
        );
    }

    #[test]
    fn test_directory_assets() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("med1-1.png"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("med2-1.svg")).unwrap();

        let assets = DirectoryAssets::new(dir.path());
        assert!(assets.contains("med1-1.png"));
        assert!(!assets.contains("med1-1.svg"));
        // Directories are not images
        assert!(!assets.contains("med2-1.svg"));
        assert!(!assets.contains("../med1-1.png"));
    }
}
