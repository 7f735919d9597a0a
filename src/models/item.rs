use std::path::{Path, PathBuf};

/// Extensions the carousel knows how to decode.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

/// One entry of the carousel's content list.
///
/// Items are supplied by the host screen and never mutated by the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub title: String,
    /// `None` renders the "No Image" fallback.
    pub image: Option<PathBuf>,
}

impl Item {
    pub fn new(id: u32, title: impl Into<String>, image: impl Into<PathBuf>) -> Self {
        Self {
            id,
            title: title.into(),
            image: Some(image.into()),
        }
    }

    /// Create an item without an image reference
    #[cfg(test)]
    pub fn without_image(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            image: None,
        }
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Check if a path carries an image extension we can decode
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_without_image() {
        let item = Item::without_image(3, "Zurich");
        assert!(!item.has_image());
        assert_eq!(item.image(), None);
    }

    #[test]
    fn test_image_extensions() {
        assert!(is_image_path(Path::new("one.jpg")));
        assert!(is_image_path(Path::new("TWO.JPEG")));
        assert!(is_image_path(Path::new("scan.tif")));
        assert!(!is_image_path(Path::new("clip.mp4")));
        assert!(!is_image_path(Path::new("README")));
    }
}
