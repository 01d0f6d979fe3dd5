//! Command-line front-end for the sample organizer.

mod cli;

use std::path::{Path, PathBuf};

use cli::{Command, Invocation, parse_args};
use sampson::{
    file_browser::{EntryKind, FileBrowser, mount_points},
    logging::{self, ConsoleVerbosity},
    naming::NamingRules,
    organize::{LogKind, OrganizeMessage, OrganizeOptions, OrganizeRunner},
    preview::build_preview,
    profiles::ProfileSet,
    sample_files::collect_audio_files,
    settings::{self, AppSettings},
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Invocation {
        command,
        overrides,
        verbose,
    } = parse_args(std::env::args().skip(1).collect())?;
    if command == Command::Help {
        println!("{}", cli::help_text());
        return Ok(());
    }

    let verbosity = if verbose {
        ConsoleVerbosity::Verbose
    } else {
        ConsoleVerbosity::Quiet
    };
    if let Err(err) = logging::init(verbosity) {
        eprintln!("Logging disabled: {err}");
    }

    let mut settings = settings::load_or_default().map_err(|err| err.to_string())?;
    overrides.apply_to(&mut settings);
    let profiles = ProfileSet::with_custom(&settings.profiles).map_err(|err| err.to_string())?;

    let outcome = match command {
        Command::Help => Ok(()),
        Command::Profiles => {
            list_profiles(&profiles, &settings);
            Ok(())
        }
        Command::Browse { volumes: true, .. } => {
            list_volumes();
            Ok(())
        }
        Command::Browse { dir, .. } => dir
            .or_else(|| settings.source.clone())
            .map_or_else(std::env::current_dir, Ok)
            .map_err(|err| format!("Unable to resolve current directory: {err}"))
            .and_then(|start| browse(&start))
            .map(|active| settings.source = Some(active)),
        Command::Preview => preview(&settings, &profiles),
        Command::Run => organize(&settings, &profiles),
    };

    if outcome.is_ok() {
        if let Err(err) = settings::save(&settings) {
            eprintln!("Failed to save settings: {err}");
        }
    }
    outcome
}

fn list_profiles(profiles: &ProfileSet, settings: &AppSettings) {
    let active = profiles.lookup(&settings.profile).ok().map(|p| p.name.as_str());
    for profile in profiles.iter() {
        let marker = if Some(profile.name.as_str()) == active { '*' } else { ' ' };
        let limit = profile
            .path_limit
            .map(|limit| format!("{limit} characters"))
            .unwrap_or_else(|| "no path limit".to_string());
        println!("{marker} {:<12} {limit}", profile.name);
    }
}

fn list_volumes() {
    for mount in mount_points() {
        println!("{}", mount.display());
    }
}

fn browse(dir: &Path) -> Result<PathBuf, String> {
    let browser = FileBrowser::open(dir)
        .ok_or_else(|| format!("Not a directory: {}", dir.display()))?;
    println!("{}", browser.current_dir().display());
    for (idx, entry) in browser.listing().entries.iter().enumerate() {
        let icon = match entry.kind {
            EntryKind::Up => '↑',
            EntryKind::Folder => '▶',
            EntryKind::AudioFile => '♪',
        };
        println!("{idx:>4}  {icon}  {}", entry.name);
    }
    Ok(browser.current_dir().to_path_buf())
}

fn required_source(settings: &AppSettings) -> Result<&Path, String> {
    settings
        .source
        .as_deref()
        .filter(|source| source.is_dir())
        .ok_or_else(|| "Please navigate to a source directory (--source DIR).".to_string())
}

fn preview(settings: &AppSettings, profiles: &ProfileSet) -> Result<(), String> {
    let source = required_source(settings)?;
    let profile = profiles.lookup(&settings.profile).map_err(|err| err.to_string())?;
    let files = collect_audio_files(source).map_err(|err| err.to_string())?;
    let rules = NamingRules {
        keep_names: settings.keep_names,
        structure: settings.structure,
        path_limit: profile.path_limit,
    };
    let preview = build_preview(&files, source, settings.destination.as_deref(), rules);

    println!("{}  ·  {}", preview.count_label(), preview.summary());
    let width = preview
        .rows
        .iter()
        .map(|row| row.original.chars().count())
        .max()
        .unwrap_or(0);
    for row in &preview.rows {
        println!("{:<width$}  →  {}", row.original, row.display_target());
    }
    Ok(())
}

fn organize(settings: &AppSettings, profiles: &ProfileSet) -> Result<(), String> {
    let source = required_source(settings)?.to_path_buf();
    let destination = settings
        .destination
        .clone()
        .ok_or_else(|| "Please select a valid destination folder (--dest DIR).".to_string())?;
    let profile = profiles.lookup(&settings.profile).map_err(|err| err.to_string())?;
    let options = OrganizeOptions {
        source,
        destination,
        operation: settings.operation,
        dry_run: settings.dry_run,
        keep_names: settings.keep_names,
        structure: settings.structure,
        path_limit: profile.path_limit,
        conflict: settings.conflict,
    };

    let mut runner = OrganizeRunner::new();
    runner.start(options).map_err(|err| err.to_string())?;
    let mut summary = None;
    while let Some(message) = runner.recv() {
        match message {
            OrganizeMessage::Log(line) if line.kind == LogKind::Error => eprintln!("{}", line.text),
            OrganizeMessage::Log(line) => println!("{}", line.text),
            OrganizeMessage::Finished(finished) => summary = Some(finished),
            OrganizeMessage::Status(_)
            | OrganizeMessage::SetTotal(_)
            | OrganizeMessage::Progress { .. } => {}
        }
    }
    let summary = summary.ok_or_else(|| "Organize worker stopped unexpectedly".to_string())?;
    println!("{}", summary.status_text());
    if summary.dry_run && summary.total > 0 {
        println!("Dry run: nothing was written. Re-run with --apply to write files.");
    }
    if summary.failed() > 0 {
        return Err(format!("{} file(s) could not be processed", summary.failed()));
    }
    Ok(())
}
