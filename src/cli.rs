//! Argument parsing for the `sampson` binary.

use std::path::{self, PathBuf};

use sampson::{
    naming::StructureMode,
    organize::{ConflictPolicy, Operation},
    settings::AppSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List a directory the way the source deck shows it.
    Browse { dir: Option<PathBuf>, volumes: bool },
    Preview,
    Run,
    Profiles,
    Help,
}

/// Flags that override the saved settings for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub operation: Option<Operation>,
    pub dry_run: Option<bool>,
    pub keep_names: Option<bool>,
    pub structure: Option<StructureMode>,
    pub profile: Option<String>,
    pub conflict: Option<ConflictPolicy>,
}

impl Overrides {
    /// Fold the overrides into `settings`, which then become the saved defaults.
    pub fn apply_to(self, settings: &mut AppSettings) {
        if let Some(source) = self.source {
            settings.source = Some(source);
        }
        if let Some(destination) = self.destination {
            settings.destination = Some(destination);
        }
        if let Some(operation) = self.operation {
            settings.operation = operation;
        }
        if let Some(dry_run) = self.dry_run {
            settings.dry_run = dry_run;
        }
        if let Some(keep_names) = self.keep_names {
            settings.keep_names = keep_names;
        }
        if let Some(structure) = self.structure {
            settings.structure = structure;
        }
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(conflict) = self.conflict {
            settings.conflict = conflict;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub overrides: Overrides,
    pub verbose: bool,
}

pub fn parse_args(args: Vec<String>) -> Result<Invocation, String> {
    let mut command = None;
    let mut overrides = Overrides::default();
    let mut verbose = false;
    let mut volumes = false;
    let mut positional = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        match arg {
            "-h" | "--help" => command = Some(Command::Help),
            "-v" | "--verbose" => verbose = true,
            "--source" => overrides.source = Some(absolute(value(&args, &mut idx, arg)?)?),
            "--dest" => overrides.destination = Some(absolute(value(&args, &mut idx, arg)?)?),
            "--move" => overrides.operation = Some(Operation::Move),
            "--copy" => overrides.operation = Some(Operation::Copy),
            "--dry-run" => overrides.dry_run = Some(true),
            "--apply" => overrides.dry_run = Some(false),
            "--keep-names" => overrides.keep_names = Some(true),
            "--rename" => overrides.keep_names = Some(false),
            "--structure" => {
                let raw = value(&args, &mut idx, arg)?;
                overrides.structure =
                    Some(raw.parse::<StructureMode>().map_err(|err| err.to_string())?);
            }
            "--profile" => overrides.profile = Some(value(&args, &mut idx, arg)?.to_string()),
            "--conflict" => {
                let raw = value(&args, &mut idx, arg)?;
                overrides.conflict =
                    Some(raw.parse::<ConflictPolicy>().map_err(|err| err.to_string())?);
            }
            "--volumes" => volumes = true,
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            word => positional.push(word.to_string()),
        }
        idx += 1;
    }

    let mut positional = positional.into_iter();
    let parsed = match positional.next().as_deref() {
        _ if command == Some(Command::Help) => Command::Help,
        None => Command::Help,
        Some("browse") => Command::Browse {
            dir: positional.next().as_deref().map(absolute).transpose()?,
            volumes,
        },
        Some("preview") => Command::Preview,
        Some("run") => Command::Run,
        Some("profiles") => Command::Profiles,
        Some(other) => return Err(format!("Unknown command: {other}\n\n{}", help_text())),
    };
    if let Some(extra) = positional.next() {
        return Err(format!("Unexpected argument: {extra}"));
    }
    Ok(Invocation {
        command: parsed,
        overrides,
        verbose,
    })
}

/// Resolve `raw` against the working directory so saved folders stay valid
/// from anywhere.
fn absolute(raw: &str) -> Result<PathBuf, String> {
    path::absolute(raw).map_err(|err| format!("Invalid path '{raw}': {err}"))
}

fn value<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str, String> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

pub fn help_text() -> &'static str {
    "sampson — organize audio samples for hardware samplers

Usage:
  sampson browse [DIR] [--volumes]   List folders and audio files in DIR
  sampson preview [options]          Show the names files will get
  sampson run [options]              Copy or move files into the destination
  sampson profiles                   List hardware profiles

Options (saved as defaults for the next run):
  --source DIR          Source directory (Deck A)
  --dest DIR            Destination directory (Deck B)
  --copy | --move       Copy (default) or move files
  --dry-run | --apply   Only log what would happen (default), or write files
  --keep-names          Keep original names instead of prefixing the parent folder
  --rename              Prefix the parent folder name (default)
  --structure MODE      flat | mirror | parent
  --profile NAME        Hardware profile, e.g. M8
  --conflict POLICY     overwrite | skip | rename
  -v, --verbose         Echo log records to stderr
  -h, --help            Show this help"
}
