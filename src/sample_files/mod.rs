//! Discovery of audio sample files on disk.

mod audio_support;
mod scanner;

pub use audio_support::{SUPPORTED_AUDIO_EXTENSIONS, is_supported_audio};
pub use scanner::{ScanError, collect_audio_files};
