use image::{Rgb, RgbImage};
use sequence_preparation::{Label, LabelMap};
use std::path::{Path, PathBuf};

/// Writes a sample directory `root/name` with `frame0..frame{count-1}.png`,
/// every pixel set to `shade` so a sample's origin is recoverable from its
/// decoded pixels.
pub fn write_sample(root: &Path, name: &str, frame_count: usize, shade: u8) -> PathBuf {
    let dir = root.join(name);
    std::fs::create_dir(&dir).unwrap();
    for index in 0..frame_count {
        write_frame(&dir, index, shade);
    }
    dir
}

pub fn write_frame(dir: &Path, index: usize, shade: u8) {
    let mut img = RgbImage::new(8, 8);
    for pixel in img.pixels_mut() {
        *pixel = Rgb([shade, shade, shade]);
    }
    img.save(dir.join(format!("frame{}.png", index))).unwrap();
}

pub fn mapping_of(entries: &[(PathBuf, Label)]) -> LabelMap {
    entries.iter().cloned().collect()
}

/// Expected normalized pixel value for a shade written by [`write_sample`].
pub fn normalized(shade: u8) -> f32 {
    shade as f32 / 255.0
}
