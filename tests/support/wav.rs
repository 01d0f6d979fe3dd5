use std::path::Path;

pub fn write_test_wav(path: &Path, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Write a short wav at each relative path below `root`.
pub fn write_tree(root: &Path, relative_paths: &[&str]) {
    for relative in relative_paths {
        write_test_wav(&root.join(relative), &[0.0, 0.25, -0.25, 0.5]);
    }
}

pub fn read_sample_count(path: &Path) -> u32 {
    hound::WavReader::open(path)
        .expect("open wav for reading")
        .duration()
}
