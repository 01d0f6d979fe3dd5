use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{info, warn};

use super::{
    ConflictPolicy, LogLine, OrganizeFinished, OrganizeMessage, OrganizeOptions, TransferError, TransferOutcome,
    TransferRequest,
};
use crate::naming::compute_output;
use crate::sample_files::collect_audio_files;

/// Scan `options.source` and place every audio file at its computed target.
///
/// `on_message` receives the progress stream; `transfer` performs the actual
/// filesystem work so tests can inject failures. Per-file errors are logged and
/// recorded, and the loop continues with the next file. Under the overwrite
/// policy a file whose target was already written earlier in the same run is
/// refused instead of replacing that earlier file.
pub fn run_organize_with_progress<F, T>(
    options: &OrganizeOptions,
    mut on_message: F,
    mut transfer: T,
) -> OrganizeFinished
where
    F: FnMut(OrganizeMessage),
    T: FnMut(TransferRequest<'_>) -> Result<TransferOutcome, TransferError>,
{
    let mut finished = OrganizeFinished {
        dry_run: options.dry_run,
        ..OrganizeFinished::default()
    };
    on_message(OrganizeMessage::Status("Collecting files…".to_string()));

    let files = match collect_audio_files(&options.source) {
        Ok(files) => files,
        Err(err) => {
            warn!(source = %options.source.display(), error = %err, "Scan failed");
            let text = format!("ERROR: {err}");
            finished.errors.push(err.to_string());
            on_message(OrganizeMessage::Log(LogLine::new(text)));
            return finish(finished, on_message);
        }
    };
    finished.total = files.len();
    on_message(OrganizeMessage::SetTotal(files.len()));
    if files.is_empty() {
        return finish(finished, on_message);
    }

    info!(
        source = %options.source.display(),
        destination = %options.destination.display(),
        operation = options.operation.label(),
        dry_run = options.dry_run,
        total = files.len(),
        "Organize run started"
    );
    let rules = options.naming_rules();
    let prefix = if options.dry_run { "[DRY] " } else { "" };
    let label = options.operation.label();
    let total = files.len();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for (idx, file) in files.iter().enumerate() {
        let completed = idx + 1;
        let plan = compute_output(file, &options.source, &options.destination, rules);
        let original = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let shown = plan.relative_path();
        on_message(OrganizeMessage::Log(LogLine::new(format!(
            "{prefix}{label}: {original}  →  {}",
            shown.display()
        ))));
        on_message(OrganizeMessage::Progress { completed, total });
        on_message(OrganizeMessage::Status(format!(
            "Processing {completed} / {total}…"
        )));

        let target: PathBuf = plan.target_path(&options.destination);
        if options.conflict == ConflictPolicy::Overwrite && claimed.contains(&target) {
            warn!(
                file = %file.display(),
                target = %target.display(),
                "Target already written in this run"
            );
            let message = format!(
                "{}: {} was already written by another file in this run",
                file.display(),
                shown.display()
            );
            on_message(OrganizeMessage::Log(LogLine::new(format!("ERROR: {message}"))));
            finished.errors.push(message);
            continue;
        }
        if options.dry_run {
            claimed.insert(target);
            finished.processed += 1;
            continue;
        }
        let request = TransferRequest {
            source: file,
            target: &target,
            operation: options.operation,
            conflict: options.conflict,
        };
        match transfer(request) {
            Ok(TransferOutcome::Written(written)) => {
                claimed.insert(written);
                finished.processed += 1;
            }
            Ok(TransferOutcome::Skipped) => {
                finished.skipped += 1;
                on_message(OrganizeMessage::Log(LogLine::new(format!(
                    "Skipped {original}: {} already exists",
                    shown.display()
                ))));
            }
            Err(err) => {
                warn!(file = %file.display(), error = %err, "Transfer failed");
                let message = format!("{}: {err}", file.display());
                on_message(OrganizeMessage::Log(LogLine::new(format!("ERROR: {message}"))));
                finished.errors.push(message);
            }
        }
    }

    on_message(OrganizeMessage::Log(LogLine::new("Done.")));
    info!(
        processed = finished.processed,
        skipped = finished.skipped,
        failed = finished.failed(),
        "Organize run finished"
    );
    finish(finished, on_message)
}

fn finish<F>(finished: OrganizeFinished, mut on_message: F) -> OrganizeFinished
where
    F: FnMut(OrganizeMessage),
{
    on_message(OrganizeMessage::Status(finished.status_text()));
    on_message(OrganizeMessage::Finished(finished.clone()));
    finished
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::StructureMode;
    use crate::organize::{ConflictPolicy, LogKind, Operation, transfer_file};
    use std::{fs, path::Path};
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, path.file_name().unwrap().to_string_lossy().as_bytes()).unwrap();
    }

    fn options(source: &Path, destination: &Path) -> OrganizeOptions {
        OrganizeOptions {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            operation: Operation::Copy,
            dry_run: false,
            keep_names: false,
            structure: StructureMode::Flat,
            path_limit: None,
            conflict: ConflictPolicy::Overwrite,
        }
    }

    fn log_lines(messages: &[OrganizeMessage]) -> Vec<LogLine> {
        messages
            .iter()
            .filter_map(|message| match message {
                OrganizeMessage::Log(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn copies_with_prefixed_names() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        touch(&source.join("Kicks/boom.wav"));
        touch(&source.join("Snares/crack.aif"));

        let mut messages = Vec::new();
        let finished = run_organize_with_progress(
            &options(&source, &dest),
            |message| messages.push(message),
            transfer_file,
        );

        assert_eq!(finished.total, 2);
        assert_eq!(finished.processed, 2);
        assert!(finished.errors.is_empty());
        assert!(dest.join("Kicks_boom.wav").is_file());
        assert!(dest.join("Snares_crack.aif").is_file());
        assert!(source.join("Kicks/boom.wav").is_file());

        let lines = log_lines(&messages);
        assert_eq!(lines[0].text, "COPY: boom.wav  →  Kicks_boom.wav");
        assert_eq!(lines[0].kind, LogKind::Copy);
        assert_eq!(lines.last().unwrap().kind, LogKind::Done);
        assert!(matches!(
            messages.last(),
            Some(OrganizeMessage::Finished(summary)) if summary.processed == 2
        ));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        touch(&source.join("Kicks/boom.wav"));
        let mut opts = options(&source, &dest);
        opts.dry_run = true;
        opts.operation = Operation::Move;
        opts.structure = StructureMode::Mirror;

        let mut messages = Vec::new();
        let finished = run_organize_with_progress(
            &opts,
            |message| messages.push(message),
            |_request: TransferRequest<'_>| -> Result<TransferOutcome, TransferError> {
                panic!("dry run must not transfer")
            },
        );

        assert_eq!(finished.processed, 1);
        assert!(finished.dry_run);
        assert!(source.join("Kicks/boom.wav").is_file());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
        let first = &log_lines(&messages)[0];
        assert_eq!(first.kind, LogKind::Dry);
        assert_eq!(
            first.text,
            format!(
                "[DRY] MOVE: boom.wav  →  {}",
                Path::new("Kicks").join("Kicks_boom.wav").display()
            )
        );
    }

    #[test]
    fn failures_are_logged_and_the_batch_continues() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        touch(&source.join("a/one.wav"));
        touch(&source.join("b/two.wav"));
        touch(&source.join("c/three.wav"));

        let mut messages = Vec::new();
        let finished = run_organize_with_progress(
            &options(&source, &dest),
            |message| messages.push(message),
            |request: TransferRequest<'_>| {
                if request.source.ends_with("b/two.wav") {
                    Err(TransferError::SameFile(request.source.to_path_buf()))
                } else {
                    transfer_file(request)
                }
            },
        );

        assert_eq!(finished.total, 3);
        assert_eq!(finished.processed, 2);
        assert_eq!(finished.failed(), 1);
        assert!(dest.join("a_one.wav").is_file());
        assert!(dest.join("c_three.wav").is_file());
        assert!(
            log_lines(&messages)
                .iter()
                .any(|line| line.kind == LogKind::Error && line.text.contains("two.wav"))
        );
        let progress: Vec<usize> = messages
            .iter()
            .filter_map(|message| match message {
                OrganizeMessage::Progress { completed, .. } => Some(*completed),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![1, 2, 3]);
    }

    #[test]
    fn empty_source_reports_no_files() {
        let dir = tempdir().unwrap();
        let mut statuses = Vec::new();
        let finished = run_organize_with_progress(
            &options(dir.path(), dir.path()),
            |message| {
                if let OrganizeMessage::Status(text) = message {
                    statuses.push(text);
                }
            },
            transfer_file,
        );
        assert_eq!(finished.total, 0);
        assert_eq!(statuses.last().unwrap(), "No audio files found.");
    }

    #[test]
    fn scan_failure_is_reported_in_status() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let mut messages = Vec::new();
        let finished = run_organize_with_progress(
            &options(&missing, dir.path()),
            |message| messages.push(message),
            transfer_file,
        );
        assert_eq!(finished.total, 0);
        assert_eq!(finished.failed(), 1);
        assert!(
            log_lines(&messages)
                .iter()
                .any(|line| line.kind == LogKind::Error)
        );
        let status = finished.status_text();
        assert!(status.starts_with("Scan failed: "), "{status}");
        assert!(status.contains("gone"), "{status}");
    }

    #[test]
    fn colliding_targets_do_not_replace_each_other() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        touch(&source.join("A/boom.wav"));
        fs::write(source.join("A/boom.wav"), b"first").unwrap();
        touch(&source.join("B/boom.wav"));
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("boom.wav"), b"stale").unwrap();
        let mut opts = options(&source, &dest);
        opts.operation = Operation::Move;
        opts.keep_names = true;

        let mut messages = Vec::new();
        let finished =
            run_organize_with_progress(&opts, |message| messages.push(message), transfer_file);

        assert_eq!(finished.processed, 1);
        assert_eq!(finished.failed(), 1);
        assert_eq!(fs::read(dest.join("boom.wav")).unwrap(), b"first");
        assert!(!source.join("A/boom.wav").exists());
        assert!(source.join("B/boom.wav").is_file());
        assert!(log_lines(&messages).iter().any(|line| {
            line.kind == LogKind::Error && line.text.contains("already written")
        }));
        assert_eq!(
            finished.status_text(),
            "Complete — 1 file processed. 1 failed."
        );
    }

    #[test]
    fn dry_run_flags_colliding_targets() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        touch(&source.join("A/boom.wav"));
        touch(&source.join("B/boom.wav"));
        let mut opts = options(&source, dir.path());
        opts.dry_run = true;
        opts.keep_names = true;

        let finished = run_organize_with_progress(&opts, |_| {}, transfer_file);
        assert_eq!(finished.processed, 1);
        assert_eq!(finished.failed(), 1);
    }

    #[test]
    fn rename_policy_keeps_both_colliding_files() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        touch(&source.join("A/boom.wav"));
        touch(&source.join("B/boom.wav"));
        let mut opts = options(&source, &dest);
        opts.keep_names = true;
        opts.conflict = ConflictPolicy::Rename;

        let finished = run_organize_with_progress(&opts, |_| {}, transfer_file);
        assert_eq!(finished.processed, 2);
        assert!(finished.errors.is_empty());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 2);
    }

    #[test]
    fn skipped_targets_are_counted() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dest");
        touch(&source.join("Kicks/boom.wav"));
        touch(&dest.join("boom.wav"));
        let mut opts = options(&source, &dest);
        opts.keep_names = true;
        opts.conflict = ConflictPolicy::Skip;

        let finished = run_organize_with_progress(&opts, |_| {}, transfer_file);
        assert_eq!(finished.skipped, 1);
        assert_eq!(finished.processed, 0);
        assert_eq!(
            finished.status_text(),
            "Complete — 0 files processed. 1 skipped."
        );
    }

    #[test]
    fn path_limit_applies_to_written_files() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("d");
        fs::create_dir_all(&dest).unwrap();
        touch(&source.join("Kicks/a_rather_long_kick_name.wav"));
        let mut opts = options(&source, &dest);
        opts.keep_names = true;
        let limit = dest.to_string_lossy().chars().count() + 1 + 8;
        opts.path_limit = Some(limit);

        let finished = run_organize_with_progress(&opts, |_| {}, transfer_file);
        assert_eq!(finished.processed, 1);
        assert!(dest.join("a_ra.wav").is_file());
    }
}
