//! Rename preview: what each source file will be called at the destination.

use std::path::{Path, PathBuf};

use crate::naming::{NamingRules, compute_output};

/// Upper bound on rows materialised for display.
pub const MAX_PREVIEW_ROWS: usize = 500;

/// One "original → will become" row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub original: String,
    pub renamed: String,
    /// Destination subfolder; empty for the destination root.
    pub subfolder: PathBuf,
}

impl PreviewRow {
    /// Renamed path as shown to the user, including any subfolder.
    pub fn display_target(&self) -> String {
        if self.subfolder.as_os_str().is_empty() {
            self.renamed.clone()
        } else {
            self.subfolder.join(&self.renamed).display().to_string()
        }
    }
}

/// Preview of a whole source tree, truncated to [`MAX_PREVIEW_ROWS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub rows: Vec<PreviewRow>,
    pub total: usize,
    keep_names: bool,
}

/// Build the preview for `files` found below `source_root`.
///
/// Without a destination the path limit cannot be measured, so names are
/// shown untruncated.
pub fn build_preview(
    files: &[PathBuf],
    source_root: &Path,
    destination: Option<&Path>,
    rules: NamingRules,
) -> Preview {
    let (dest_root, rules) = match destination {
        Some(dest) => (dest, rules),
        None => (
            Path::new(""),
            NamingRules {
                path_limit: None,
                ..rules
            },
        ),
    };
    let rows = files
        .iter()
        .take(MAX_PREVIEW_ROWS)
        .map(|file| {
            let plan = compute_output(file, source_root, dest_root, rules);
            PreviewRow {
                original: file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                renamed: plan.file_name,
                subfolder: plan.subfolder,
            }
        })
        .collect();
    Preview {
        rows,
        total: files.len(),
        keep_names: rules.keep_names,
    }
}

impl Preview {
    /// Number of rows actually shown.
    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    /// Source count label, e.g. "3 audio files".
    pub fn count_label(&self) -> String {
        format!("{} audio file{}", self.total, plural(self.total))
    }

    /// One-line description of what the preview shows.
    pub fn summary(&self) -> String {
        let total = self.total;
        if total == 0 {
            "No audio files in this directory tree".to_string()
        } else if total > self.shown() {
            format!("Showing {} of {total} files", self.shown())
        } else if self.keep_names {
            format!("{total} file{}  —  names unchanged", plural(total))
        } else {
            format!("{total} file{} will be renamed", plural(total))
        }
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::StructureMode;

    fn files(count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|idx| PathBuf::from(format!("/src/Kicks/kick_{idx:04}.wav")))
            .collect()
    }

    #[test]
    fn rows_show_renamed_targets() {
        let preview = build_preview(
            &files(2),
            Path::new("/src"),
            Some(Path::new("/out")),
            NamingRules {
                structure: StructureMode::Parent,
                ..NamingRules::default()
            },
        );
        assert_eq!(preview.rows[0].original, "kick_0000.wav");
        assert_eq!(preview.rows[0].renamed, "Kicks_kick_0000.wav");
        assert_eq!(preview.rows[0].display_target(), "Kicks/Kicks_kick_0000.wav");
        assert_eq!(preview.summary(), "2 files will be renamed");
        assert_eq!(preview.count_label(), "2 audio files");
    }

    #[test]
    fn caps_rows_but_counts_everything() {
        let preview = build_preview(
            &files(MAX_PREVIEW_ROWS + 20),
            Path::new("/src"),
            None,
            NamingRules::default(),
        );
        assert_eq!(preview.shown(), MAX_PREVIEW_ROWS);
        assert_eq!(preview.total, MAX_PREVIEW_ROWS + 20);
        assert_eq!(preview.summary(), "Showing 500 of 520 files");
    }

    #[test]
    fn keep_names_summary_and_singular_labels() {
        let preview = build_preview(
            &files(1),
            Path::new("/src"),
            None,
            NamingRules {
                keep_names: true,
                ..NamingRules::default()
            },
        );
        assert_eq!(preview.rows[0].renamed, "kick_0000.wav");
        assert_eq!(preview.summary(), "1 file  —  names unchanged");
        assert_eq!(preview.count_label(), "1 audio file");
    }

    #[test]
    fn empty_tree_summary() {
        let preview = build_preview(&[], Path::new("/src"), None, NamingRules::default());
        assert_eq!(preview.summary(), "No audio files in this directory tree");
        assert_eq!(preview.count_label(), "0 audio files");
    }

    #[test]
    fn path_limit_needs_a_destination() {
        let rules = NamingRules {
            keep_names: true,
            path_limit: Some(12),
            ..NamingRules::default()
        };
        let no_dest = build_preview(&files(1), Path::new("/src"), None, rules);
        assert_eq!(no_dest.rows[0].renamed, "kick_0000.wav");

        let with_dest = build_preview(&files(1), Path::new("/src"), Some(Path::new("/o")), rules);
        // "/o/" leaves 9 characters: 5 stem + ".wav".
        assert_eq!(with_dest.rows[0].renamed, "kick_.wav");
    }
}
