use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::asset_keys::{validate_asset_name, AssetKeyError};
use super::images::{decode_png_file, Image};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {name}")]
    NotFound { name: String },
    #[error("invalid asset name {name:?}: {source}")]
    InvalidName {
        name: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("failed to read asset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("asset {name} is not a {expected}")]
    WrongKind { name: String, expected: &'static str },
}

impl AssetError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }
}

/// Read-only access to the named assets of a game.
///
/// `exists` is the probe used by catalog scans: a scan stops at the first
/// name it reports absent.
pub trait AssetSource {
    fn exists(&self, name: &str) -> bool;
    fn load_image(&self, name: &str) -> Result<Image, AssetError>;
    fn read_text(&self, name: &str) -> Result<String, AssetError>;
}

/// Assets stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        validate_asset_name(name).map_err(|source| AssetError::InvalidName {
            name: name.to_string(),
            source,
        })?;
        Ok(self.root.join(name))
    }
}

impl AssetSource for DirAssetSource {
    fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|path| path.is_file()).unwrap_or(false)
    }

    fn load_image(&self, name: &str) -> Result<Image, AssetError> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(AssetError::NotFound {
                name: name.to_string(),
            });
        }
        decode_png_file(&path).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })
    }

    fn read_text(&self, name: &str) -> Result<String, AssetError> {
        let path = self.resolve(name)?;
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AssetError::NotFound {
                    name: name.to_string(),
                }
            } else {
                AssetError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

#[derive(Debug, Clone)]
enum MemoryAsset {
    Image(Image),
    Text(String),
}

/// In-memory asset set for headless tools and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    assets: HashMap<String, MemoryAsset>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, name: impl Into<String>, image: Image) {
        self.assets.insert(name.into(), MemoryAsset::Image(image));
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.assets
            .insert(name.into(), MemoryAsset::Text(text.into()));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.assets.remove(name).is_some()
    }

    pub fn with_image(mut self, name: impl Into<String>, image: Image) -> Self {
        self.insert_image(name, image);
        self
    }

    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_text(name, text);
        self
    }

    fn get(&self, name: &str) -> Result<&MemoryAsset, AssetError> {
        validate_asset_name(name).map_err(|source| AssetError::InvalidName {
            name: name.to_string(),
            source,
        })?;
        self.assets.get(name).ok_or_else(|| AssetError::NotFound {
            name: name.to_string(),
        })
    }
}

impl AssetSource for MemoryAssetSource {
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    fn load_image(&self, name: &str) -> Result<Image, AssetError> {
        match self.get(name)? {
            MemoryAsset::Image(image) => Ok(image.clone()),
            MemoryAsset::Text(_) => Err(AssetError::WrongKind {
                name: name.to_string(),
                expected: "image",
            }),
        }
    }

    fn read_text(&self, name: &str) -> Result<String, AssetError> {
        match self.get(name)? {
            MemoryAsset::Text(text) => Ok(text.clone()),
            MemoryAsset::Image(_) => Err(AssetError::WrongKind {
                name: name.to_string(),
                expected: "text resource",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn dir_source_loads_png_and_text() {
        let temp = TempDir::new().expect("tempdir");
        let tiles = temp.path().join("images").join("Tilesets");
        fs::create_dir_all(&tiles).expect("create tiles dir");
        RgbaImage::from_pixel(32, 32, Rgba([1, 2, 3, 255]))
            .save(tiles.join("A_1.png"))
            .expect("write png");
        fs::create_dir_all(temp.path().join("maps")).expect("create maps dir");
        fs::write(temp.path().join("maps").join("map1.txt"), "AB\n").expect("write map");

        let source = DirAssetSource::new(temp.path());
        assert!(source.exists("images/Tilesets/A_1.png"));
        assert!(!source.exists("images/Tilesets/B_1.png"));

        let image = source
            .load_image("images/Tilesets/A_1.png")
            .expect("load image");
        assert_eq!((image.width(), image.height()), (32, 32));
        assert_eq!(image.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(source.read_text("maps/map1.txt").expect("text"), "AB\n");
    }

    #[test]
    fn dir_source_reports_missing_assets_as_not_found() {
        let temp = TempDir::new().expect("tempdir");
        let source = DirAssetSource::new(temp.path());

        assert!(source.read_text("maps/map9.txt").unwrap_err().is_not_found());
        assert!(source
            .load_image("images/Pomf/PomfW1.png")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn dir_source_rejects_traversal_names() {
        let temp = TempDir::new().expect("tempdir");
        let source = DirAssetSource::new(temp.path());

        assert!(!source.exists("../outside.png"));
        assert!(matches!(
            source.read_text("../outside.txt"),
            Err(AssetError::InvalidName { .. })
        ));
    }

    #[test]
    fn dir_source_surfaces_decode_failures() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("broken.png"), b"not a png").expect("write");
        let source = DirAssetSource::new(temp.path());

        assert!(matches!(
            source.load_image("broken.png"),
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn memory_source_distinguishes_kinds() {
        let source = MemoryAssetSource::new()
            .with_image("images/UI/13powerUp1.png", Image::solid(4, 4, [0; 4]))
            .with_text("maps/map1.txt", "A");

        assert!(source.exists("maps/map1.txt"));
        assert!(source.load_image("images/UI/13powerUp1.png").is_ok());
        assert!(matches!(
            source.load_image("maps/map1.txt"),
            Err(AssetError::WrongKind { .. })
        ));
        assert!(source.read_text("maps/map2.txt").unwrap_err().is_not_found());
    }
}
