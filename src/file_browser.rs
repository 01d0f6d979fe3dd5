use std::{
    fs, io,
    path::{Path, PathBuf},
};

use sysinfo::Disks;
use tracing::{debug, warn};

use crate::sample_files::is_supported_audio;

/// Kind of row shown in the source browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Link to the parent directory.
    Up,
    Folder,
    AudioFile,
}

/// A single row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
}

impl BrowserEntry {
    /// Whether activating this entry navigates somewhere.
    pub fn is_navigable(&self) -> bool {
        matches!(self.kind, EntryKind::Up | EntryKind::Folder)
    }
}

/// Contents of one directory in display order: up link, folders, audio files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub entries: Vec<BrowserEntry>,
}

impl DirectoryListing {
    /// Read `dir`, hiding dot-folders and non-audio files.
    ///
    /// An unreadable directory yields a listing with only the up link.
    pub fn read(dir: &Path) -> Self {
        let mut entries = Vec::new();
        if let Some(parent) = dir.parent().filter(|parent| *parent != dir) {
            entries.push(BrowserEntry {
                kind: EntryKind::Up,
                name: "..".to_string(),
                path: parent.to_path_buf(),
            });
        }

        let (mut folders, mut files) = match read_children(dir) {
            Ok(children) => children,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Failed to list directory");
                (Vec::new(), Vec::new())
            }
        };
        folders.sort_by_key(|entry| entry.name.to_lowercase());
        files.sort_by_key(|entry| entry.name.to_lowercase());
        entries.extend(folders);
        entries.extend(files);
        Self { entries }
    }

    pub fn folders(&self) -> impl Iterator<Item = &BrowserEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Folder)
    }

    pub fn audio_files(&self) -> impl Iterator<Item = &BrowserEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::AudioFile)
    }
}

fn read_children(dir: &Path) -> io::Result<(Vec<BrowserEntry>, Vec<BrowserEntry>)> {
    let mut folders = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follow symlinks here so linked sample folders stay browsable.
        if path.is_dir() {
            if !name.starts_with('.') {
                folders.push(BrowserEntry {
                    kind: EntryKind::Folder,
                    name,
                    path,
                });
            }
        } else if path.is_file() && is_supported_audio(&path) {
            files.push(BrowserEntry {
                kind: EntryKind::AudioFile,
                name,
                path,
            });
        }
    }
    Ok((folders, files))
}

/// Minimal filesystem navigator for picking the active source directory.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    current_dir: PathBuf,
    listing: DirectoryListing,
}

impl FileBrowser {
    /// Open the browser at `start`, or `None` when it is not a directory.
    pub fn open(start: &Path) -> Option<Self> {
        start.is_dir().then(|| Self {
            current_dir: start.to_path_buf(),
            listing: DirectoryListing::read(start),
        })
    }

    /// Directory whose audio tree feeds the preview and the organize run.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    /// Make `path` the active directory. Returns false and stays put when it is
    /// not a directory. Leaf folders with no sub-folders are valid targets.
    pub fn navigate_to(&mut self, path: &Path) -> bool {
        if !path.is_dir() {
            debug!(path = %path.display(), "Ignoring navigation to non-directory");
            return false;
        }
        self.current_dir = path.to_path_buf();
        self.listing = DirectoryListing::read(path);
        true
    }

    /// Navigate to the parent directory if there is one.
    pub fn go_up(&mut self) -> bool {
        match self.current_dir.parent() {
            Some(parent) if parent != self.current_dir => {
                let parent = parent.to_path_buf();
                self.navigate_to(&parent)
            }
            _ => false,
        }
    }

    /// Activate the entry at `index`; only folders and the up link navigate.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(entry) = self.listing.entries.get(index) else {
            return false;
        };
        if !entry.is_navigable() {
            return false;
        }
        let target = entry.path.clone();
        self.navigate_to(&target)
    }
}

/// Mounted volumes, useful for locating a sampler's SD card as destination.
pub fn mount_points() -> Vec<PathBuf> {
    let mut mounts: Vec<PathBuf> = Disks::new_with_refreshed_list()
        .iter()
        .map(|disk| disk.mount_point().to_path_buf())
        .collect();
    mounts.sort();
    mounts.dedup();
    mounts
}
