use crate::models::{Page, SiteMap};
use crate::page::PageView;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid pages directory: {0}")]
    InvalidPagesDir(String),
    #[error("Page path is not relative to the pages directory: {0}")]
    InvalidPagePath(PathBuf),
}

/// Read a markdown page and return its content
pub fn read_page(relative_path: &RelativePath, pages_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(pages_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Read and render a page
pub fn load_page_view(page: &Page, pages_root: &Path) -> Result<PageView, IoError> {
    let markdown = read_page(page.relative_path(), pages_root)?;
    Ok(PageView::from_markdown(&markdown))
}

/// Scan for markdown pages in the pages directory
pub fn scan_pages(pages_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !pages_root.exists() {
        return Err(IoError::InvalidPagesDir(
            "pages directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(pages_root, &mut files)?;
    files.sort();
    Ok(files)
}

/// Build the route table from markdown pages in the pages directory
pub fn build_site_map(pages_root: &Path) -> Result<SiteMap, IoError> {
    let files = scan_pages(pages_root)?;

    let mut site = SiteMap::new();
    for file in files {
        let relative = file
            .strip_prefix(pages_root)
            .ok()
            .and_then(|p| RelativePathBuf::from_path(p).ok())
            .ok_or_else(|| IoError::InvalidPagePath(file.clone()))?;
        if let Some(replaced) = site.add_page(Page::new(relative.clone())) {
            log::warn!(
                "route {} is claimed by both {} and {}, keeping {}",
                replaced.route(),
                replaced.relative_path(),
                relative,
                relative
            );
        }
    }
    log::debug!("found {} pages under {}", site.len(), pages_root.display());
    Ok(site)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_pages_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidPagesDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
