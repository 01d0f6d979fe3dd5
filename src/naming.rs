//! Destination filename and subfolder computation.
//!
//! Everything here is pure path arithmetic: no filesystem access, so the
//! preview table and the organize worker always agree on where a file lands.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Destination layout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureMode {
    /// Every file lands directly in the destination root.
    #[default]
    Flat,
    /// Reproduce the source hierarchy below the destination root.
    Mirror,
    /// One folder per immediate parent directory.
    Parent,
}

impl StructureMode {
    pub const ALL: [StructureMode; 3] = [Self::Flat, Self::Mirror, Self::Parent];

    pub fn as_str(self) -> &'static str {
        match self {
            StructureMode::Flat => "flat",
            StructureMode::Mirror => "mirror",
            StructureMode::Parent => "parent",
        }
    }
}

impl fmt::Display for StructureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a structure mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown structure mode '{0}' (expected flat, mirror or parent)")]
pub struct ParseStructureModeError(String);

impl FromStr for StructureMode {
    type Err = ParseStructureModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseStructureModeError(value.to_string()))
    }
}

/// Where a single source file ends up, relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Final filename written to disk.
    pub file_name: String,
    /// Folder below the destination root; empty for the root itself.
    pub subfolder: PathBuf,
}

impl OutputPlan {
    /// Path of the output relative to the destination root.
    pub fn relative_path(&self) -> PathBuf {
        self.subfolder.join(&self.file_name)
    }

    /// Folder the output is written into.
    pub fn target_dir(&self, dest_root: &Path) -> PathBuf {
        if self.subfolder.as_os_str().is_empty() {
            dest_root.to_path_buf()
        } else {
            dest_root.join(&self.subfolder)
        }
    }

    /// Absolute output path below `dest_root`.
    pub fn target_path(&self, dest_root: &Path) -> PathBuf {
        self.target_dir(dest_root).join(&self.file_name)
    }
}

/// Name-related inputs shared by every file in one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamingRules {
    /// Keep the original filename instead of prefixing the parent folder name.
    pub keep_names: bool,
    pub structure: StructureMode,
    /// Maximum total path length in characters, if the device has one.
    pub path_limit: Option<usize>,
}

/// Shorten `file_name` so `dest_dir/file_name` fits within `limit` characters.
///
/// Only the stem is shortened; the extension is always kept and at least one
/// stem character survives even when the destination alone exceeds the limit.
pub fn apply_path_limit(file_name: &str, dest_dir: &Path, limit: usize) -> String {
    let full = dest_dir.join(file_name);
    let full_len = char_len(&full.to_string_lossy());
    if full_len <= limit {
        return file_name.to_string();
    }
    let name_len = char_len(file_name);
    let prefix_len = full_len.saturating_sub(name_len);

    let name_path = Path::new(file_name);
    let ext = name_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let stem = name_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let avail = limit
        .saturating_sub(prefix_len + char_len(&ext))
        .max(1);
    let mut truncated: String = stem.chars().take(avail).collect();
    truncated.push_str(&ext);
    truncated
}

/// Compute the output filename and subfolder for one source file.
pub fn compute_output(
    file: &Path,
    source_root: &Path,
    dest_root: &Path,
    rules: NamingRules,
) -> OutputPlan {
    let original = file_name_lossy(file);
    let parent = file.parent();
    let file_name = if rules.keep_names {
        original
    } else {
        let parent_name = parent.map(file_name_lossy).unwrap_or_default();
        format!("{parent_name}_{original}")
    };

    let subfolder = match rules.structure {
        StructureMode::Flat => PathBuf::new(),
        StructureMode::Mirror => parent
            .and_then(|parent| parent.strip_prefix(source_root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        StructureMode::Parent => match parent {
            Some(parent) if parent != source_root => PathBuf::from(file_name_lossy(parent)),
            _ => PathBuf::new(),
        },
    };

    let mut plan = OutputPlan {
        file_name,
        subfolder,
    };
    if let Some(limit) = rules.path_limit {
        let target_dir = plan.target_dir(dest_root);
        plan.file_name = apply_path_limit(&plan.file_name, &target_dir, limit);
    }
    plan
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
