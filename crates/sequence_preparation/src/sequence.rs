use crate::frame::{FrameShape, Sequence};
use crate::loader::load_frame;
use anyhow::{anyhow, bail, ensure, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the ordered frame paths for a sample directory.
///
/// A sample directory contains files named `frame<i>.<ext>` for
/// `i = 0..count-1`, where `count` is the number of directory entries. The
/// paths are built from the indices, never from the listing order, so the
/// result is deterministic regardless of filesystem enumeration.
///
/// A missing indexed file is not detected here; it surfaces as a load error
/// during assembly, which keeps the listing cheap.
pub fn frame_paths(sample_dir: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(sample_dir)
        .with_context(|| format!("Failed to access sample directory: {}", sample_dir.display()))?;
    if !metadata.is_dir() {
        bail!("Sample path is not a directory: {}", sample_dir.display());
    }

    let mut count = 0usize;
    // Extension of the lowest-indexed frame entry governs the whole sample.
    let mut extension: Option<(usize, String)> = None;
    for entry in fs::read_dir(sample_dir)
        .with_context(|| format!("Failed to list sample directory: {}", sample_dir.display()))?
    {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry: {}", sample_dir.display()))?;
        count += 1;

        if let Some((index, ext)) = entry.file_name().to_str().and_then(parse_frame_name) {
            match &extension {
                Some((best, _)) if *best <= index => {}
                _ => extension = Some((index, ext)),
            }
        }
    }

    ensure!(count > 0, "Sample directory is empty: {}", sample_dir.display());
    let (_, ext) = extension.ok_or_else(|| {
        anyhow!(
            "No frame<i>.<ext> entries found in sample directory: {}",
            sample_dir.display()
        )
    })?;

    Ok((0..count)
        .map(|i| sample_dir.join(format!("frame{}.{}", i, ext)))
        .collect())
}

/// Splits `frame<i>.<ext>` into `(i, ext)`; returns `None` for anything else.
fn parse_frame_name(name: &str) -> Option<(usize, String)> {
    let rest = name.strip_prefix("frame")?;
    let (index, ext) = rest.split_once('.')?;
    let index: usize = index.parse().ok()?;
    if ext.is_empty() {
        return None;
    }
    Some((index, ext.to_string()))
}

/// Assembles a sample directory into an ordered sequence of decoded frames.
///
/// Applies [`load_frame`] to each indexed path in order. Any missing or
/// undecodable frame fails the whole assembly; a silently truncated sequence
/// would break downstream length invariants.
pub fn build_sequence(sample_dir: &Path, target: FrameShape) -> Result<Sequence> {
    let paths = frame_paths(sample_dir)?;
    paths
        .iter()
        .map(|path| {
            load_frame(path, target).with_context(|| {
                format!("Failed to assemble sequence: {}", sample_dir.display())
            })
        })
        .collect()
}
