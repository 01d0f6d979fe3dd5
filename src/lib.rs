//! Library exports for the sample organizer and its command-line front-end.
/// Application directory resolution.
pub mod app_dirs;
/// Source folder navigation.
pub mod file_browser;
/// Logging setup.
pub mod logging;
/// Destination filename and subfolder computation.
pub mod naming;
/// Batch copy/move worker and its progress stream.
pub mod organize;
/// Rename preview tables.
pub mod preview;
/// Hardware device profiles.
pub mod profiles;
/// Audio file discovery.
pub mod sample_files;
/// Persisted settings.
pub mod settings;
