use std::path::Path;

/// Audio extensions recognised in source folders (lowercase, without dots).
pub const SUPPORTED_AUDIO_EXTENSIONS: [&str; 6] = ["wav", "aiff", "aif", "flac", "mp3", "ogg"];

/// Return true if the path has a supported audio extension.
pub fn is_supported_audio(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    SUPPORTED_AUDIO_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}
