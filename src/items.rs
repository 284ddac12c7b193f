use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::error::{Error, Result};

/// One slide in the rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Stable 0-based position in the strip.
    pub index: usize,
    pub image: PathBuf,
    /// When set the displayed image is wrapped in a link to this target.
    pub link: Option<String>,
    /// Pixel size of the image, when it could be read.
    pub dimensions: Option<(u32, u32)>,
}

impl Item {
    pub fn new(index: usize, image: impl Into<PathBuf>) -> Self {
        Self {
            index,
            image: image.into(),
            link: None,
            dimensions: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }
}

/// Build the item list for a configuration: explicit entries first, then
/// everything found under `library-path` in path order.
#[instrument(skip(cfg), fields(explicit = cfg.items.len()))]
pub fn from_configuration(cfg: &Configuration) -> Result<Vec<Item>> {
    let mut sources: Vec<(PathBuf, Option<String>)> = cfg
        .items
        .iter()
        .map(|entry| (entry.image.clone(), entry.link.clone()))
        .collect();

    if let Some(root) = &cfg.library_path {
        let scanned = scan_library(root)?;
        info!(root = %root.display(), discovered = scanned.len(), "library scan complete");
        sources.extend(scanned.into_iter().map(|p| (p, None)));
    }

    if sources.is_empty() {
        return Err(Error::NoItems);
    }

    Ok(sources
        .into_iter()
        .enumerate()
        .map(|(index, (image, link))| {
            let mut item = Item::new(index, image);
            item.link = link;
            item.dimensions = read_dimensions(&item.image);
            item
        })
        .collect())
}

/// Recursively collect supported images under `root`, sorted by path so the
/// strip order is stable across runs.
pub fn scan_library(root: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        )));
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_image(p))
        .collect();
    found.sort();
    Ok(found)
}

fn read_dimensions(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok(dims) => Some(dims),
        Err(err) => {
            debug!(path = %path.display(), "could not read image dimensions: {err}");
            None
        }
    }
}

#[inline]
pub fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(OsStr::to_str)
            .map(|s| s.to_ascii_lowercase()),
        Some(ref e) if ["jpg", "jpeg", "png", "gif", "webp"].contains(&e.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_image_extensions_case_insensitively() {
        assert!(is_image(Path::new("/a/b.JPG")));
        assert!(is_image(Path::new("c.webp")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("no_extension")));
    }
}
