// ABOUTME: Static asset discovery and loading for the statics phase.
// ABOUTME: Walks the asset tree, skips hidden entries, and sniffs each file's content type.

pub mod sniff;

use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A static asset ready for upload.
#[derive(Debug, Clone)]
pub struct StaticFile {
    /// Path relative to the asset root, always `/`-separated.
    pub relative_path: String,
    pub contents: Bytes,
    pub content_type: &'static str,
}

impl StaticFile {
    /// Read `path` (somewhere under `root`) and detect its content type.
    pub fn load(root: &Path, path: &Path) -> io::Result<Self> {
        let relative_path = relative_path(root, path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not under {}", path.display(), root.display()),
            )
        })?;
        let contents = Bytes::from(std::fs::read(path)?);
        let content_type = sniff::content_type(&contents);

        Ok(Self {
            relative_path,
            contents,
            content_type,
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// All regular, non-hidden files under `root`, in a stable order.
///
/// Hidden directories are not descended into. The root itself is never
/// treated as hidden.
pub fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        // Follows symlinked files; symlinked directories are not descended.
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// `path` relative to `root`, joined with `/` regardless of platform.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}
