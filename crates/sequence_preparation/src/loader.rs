use crate::frame::{Frame, FrameShape};
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use ndarray::Array3;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Loads a single frame file from disk, resizes it to `target`, and converts
/// it to a `(H, W, C)` f32 tensor with values scaled from `[0, 255]` to
/// `[0.0, 1.0]`.
///
/// Every call re-reads from disk; the engine is I/O-bound by design and does
/// not cache decoded frames.
///
/// Fails if the path does not exist or the file is not a decodable image,
/// with the offending path in the error context.
pub fn load_frame(path: &Path, target: FrameShape) -> Result<Frame> {
    let file =
        File::open(path).with_context(|| format!("Failed to open frame: {}", path.display()))?;

    let file_size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let mut reader = BufReader::with_capacity(8192, file);
    let mut buffer = Vec::with_capacity(file_size);
    reader
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read frame: {}", path.display()))?;

    let image = ImageReader::new(Cursor::new(buffer))
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("Failed to decode frame: {}", path.display()))?;

    let resized = image.resize_exact(
        target.width as u32,
        target.height as u32,
        FilterType::Triangle,
    );

    let raw: Vec<u8> = match target.channels {
        1 => resized.to_luma8().into_raw(),
        _ => resized.to_rgb8().into_raw(),
    };

    let pixels: Vec<f32> = raw.into_iter().map(|v| v as f32 / 255.0).collect();
    let frame = Array3::from_shape_vec((target.height, target.width, target.channels), pixels)
        .with_context(|| format!("Decoded frame has unexpected size: {}", path.display()))?;
    Ok(frame)
}
