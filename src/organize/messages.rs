use crate::preview::plural;

/// Colour class of a log line, mirroring how the log panel tags entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Plain,
    Copy,
    Move,
    Dry,
    Error,
    Done,
}

impl LogKind {
    /// Classify a free-form line by its content.
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        if text.contains("[DRY]") {
            LogKind::Dry
        } else if text.starts_with("MOVE") {
            LogKind::Move
        } else if text.starts_with("COPY") {
            LogKind::Copy
        } else if text.starts_with("ERROR") {
            LogKind::Error
        } else if text == "Done." {
            LogKind::Done
        } else {
            LogKind::Plain
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LogKind,
    pub text: String,
}

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: LogKind::classify(&text),
            text,
        }
    }
}

/// Progress stream emitted by the organize worker.
#[derive(Debug, Clone)]
pub enum OrganizeMessage {
    /// Status bar text.
    Status(String),
    /// Number of files the run will visit.
    SetTotal(usize),
    Log(LogLine),
    Progress { completed: usize, total: usize },
    Finished(OrganizeFinished),
}

impl OrganizeMessage {
    /// Whole-number completion percentage for a progress message.
    pub fn percent(completed: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        (completed.min(total) * 100 / total) as u8
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeFinished {
    pub total: usize,
    /// Files copied or moved (or that would be, in a dry run).
    pub processed: usize,
    /// Files left alone because the target existed.
    pub skipped: usize,
    pub errors: Vec<String>,
    pub dry_run: bool,
}

impl OrganizeFinished {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// Final status bar text.
    pub fn status_text(&self) -> String {
        if self.total == 0 {
            return match self.errors.first() {
                Some(err) => format!("Scan failed: {err}"),
                None => "No audio files found.".to_string(),
            };
        }
        let mut text = format!(
            "Complete — {} file{} processed.",
            self.processed,
            plural(self.processed)
        );
        if self.skipped > 0 {
            text.push_str(&format!(" {} skipped.", self.skipped));
        }
        if self.failed() > 0 {
            text.push_str(&format!(" {} failed.", self.failed()));
        }
        text
    }
}
