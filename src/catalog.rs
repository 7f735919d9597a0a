// Item sources for the host screen: the built-in demo list and directory scans.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::models::{is_image_path, Item};

const DEMO_IMAGES: &[(&str, &str)] = &[
    ("Lake Oeschinen", "one.jpg"),
    ("Matterhorn", "two.jpg"),
    ("Zurich", "three.jpg"),
    ("Hue", "four.jpg"),
    ("Also Matterhorn", "five.jpg"),
    ("Hanoi", "six.jpg"),
    ("Beer", "seven.jpg"),
    ("Zermatt", "eight.jpg"),
];

/// The static demo list, with image files resolved under `asset_dir`.
pub fn demo_items(asset_dir: &Path) -> Vec<Item> {
    DEMO_IMAGES
        .iter()
        .zip(1u32..)
        .map(|((title, file), id)| Item::new(id, *title, asset_dir.join(file)))
        .collect()
}

/// Lists the images directly inside `dir`, sorted by file name.
///
/// Ids are assigned from 1 in listing order and the title is the file stem.
pub fn scan_directory(dir: &Path) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list directory: {:?}", dir))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_path(path) {
            continue;
        }
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let id = items.len() as u32 + 1;
        items.push(Item::new(id, title, path));
    }

    tracing::info!("Found {} images in {}", items.len(), dir.display());
    Ok(items)
}
