//! Augmentation policy and batch generators.
//!
//! A [`FrameProcessor`] owns a validated [`AugmentationConfig`] and a target
//! [`FrameShape`], and builds the two generator flavours:
//!
//! - [`FrameProcessor::frame_generator`]: infinite randomized batches for
//!   training/validation — sample paths without replacement, assemble each
//!   sequence, apply the enabled transforms in a fixed order.
//! - [`FrameProcessor::testing_generator`]: infinite deterministic
//!   round-robin over the mapping's keys, one un-augmented sample per pull.
//!
//! Both are plain `Iterator<Item = Result<Batch>>`; wrap them in
//! [`crate::threadsafe::ThreadSafeIterator`] to pull from several threads.

use crate::frame::{Batch, FrameShape, Label};
use crate::rng::{GlobalSource, RandomSource};
use crate::sequence::build_sequence;
use crate::transforms::{
    sequence_flip, sequence_rotation, sequence_shear, sequence_shift, sequence_zoom, FillMode,
    FlipAxis,
};
use anyhow::{ensure, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Path -> label mapping consumed by the generators.
///
/// `BTreeMap` keeps key iteration order deterministic, which the round-robin
/// testing generator depends on.
pub type LabelMap = BTreeMap<PathBuf, Label>;

// ============================================================================
// AugmentationConfig
// ============================================================================

/// Immutable augmentation policy, validated once at construction.
///
/// # Example
/// ```ignore
/// let config = AugmentationConfig::builder()
///     .rotation_range(15)
///     .width_shift_range(0.1)
///     .height_shift_range(0.1)
///     .zoom_range(0.2)
///     .horizontal_flip(true)
///     .batch_size(8)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct AugmentationConfig {
    /// Degree range for random rotations. Non-negative by type, mirroring the
    /// integer-valued contract of the original policy.
    pub rotation_range: u32,
    /// Fraction of total width for horizontal shifts, in `[0, 1]`.
    pub width_shift_range: f32,
    /// Fraction of total height for vertical shifts, in `[0, 1]`.
    pub height_shift_range: f32,
    /// Shear angle range in degrees, non-negative.
    pub shear_range: f32,
    /// Zoom interval half-width: draws come from `[1 - z, 1 + z]`.
    pub zoom_range: f32,
    /// Flip columns with probability 0.5 per sample.
    pub horizontal_flip: bool,
    /// Flip rows with probability 0.5 per sample.
    pub vertical_flip: bool,
    /// Samples per generated batch, positive.
    pub batch_size: usize,
    /// Out-of-bounds policy for affine warps.
    pub fill_mode: FillMode,
    /// Fill value for [`FillMode::Constant`].
    pub cval: f32,
}

impl AugmentationConfig {
    pub fn builder() -> AugmentationConfigBuilder {
        AugmentationConfigBuilder::default()
    }

    /// True if any randomized transform is enabled.
    fn augments(&self) -> bool {
        self.rotation_range > 0
            || self.width_shift_range > 0.0
            || self.height_shift_range > 0.0
            || self.shear_range > 0.0
            || self.zoom_range > 0.0
            || self.horizontal_flip
            || self.vertical_flip
    }
}

/// Builder for [`AugmentationConfig`] with method chaining. Defaults are the
/// no-op policy with batch size 4.
pub struct AugmentationConfigBuilder {
    config: AugmentationConfig,
}

impl Default for AugmentationConfigBuilder {
    fn default() -> Self {
        Self {
            config: AugmentationConfig {
                rotation_range: 0,
                width_shift_range: 0.0,
                height_shift_range: 0.0,
                shear_range: 0.0,
                zoom_range: 0.0,
                horizontal_flip: false,
                vertical_flip: false,
                batch_size: 4,
                fill_mode: FillMode::Nearest,
                cval: 0.0,
            },
        }
    }
}

impl AugmentationConfigBuilder {
    pub fn rotation_range(mut self, degrees: u32) -> Self {
        self.config.rotation_range = degrees;
        self
    }

    pub fn width_shift_range(mut self, fraction: f32) -> Self {
        self.config.width_shift_range = fraction;
        self
    }

    pub fn height_shift_range(mut self, fraction: f32) -> Self {
        self.config.height_shift_range = fraction;
        self
    }

    pub fn shear_range(mut self, degrees: f32) -> Self {
        self.config.shear_range = degrees;
        self
    }

    pub fn zoom_range(mut self, half_width: f32) -> Self {
        self.config.zoom_range = half_width;
        self
    }

    pub fn horizontal_flip(mut self, enabled: bool) -> Self {
        self.config.horizontal_flip = enabled;
        self
    }

    pub fn vertical_flip(mut self, enabled: bool) -> Self {
        self.config.vertical_flip = enabled;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn fill_mode(mut self, mode: FillMode) -> Self {
        self.config.fill_mode = mode;
        self
    }

    pub fn cval(mut self, value: f32) -> Self {
        self.config.cval = value;
        self
    }

    /// Validates and builds the configuration. Invalid parameters fail here,
    /// before any generator exists.
    pub fn build(self) -> Result<AugmentationConfig> {
        let config = self.config;
        ensure!(
            config.width_shift_range.is_finite()
                && (0.0..=1.0).contains(&config.width_shift_range),
            "width_shift_range should be in [0, 1], got {}",
            config.width_shift_range
        );
        ensure!(
            config.height_shift_range.is_finite()
                && (0.0..=1.0).contains(&config.height_shift_range),
            "height_shift_range should be in [0, 1], got {}",
            config.height_shift_range
        );
        ensure!(
            config.shear_range.is_finite() && config.shear_range >= 0.0,
            "shear_range should be a non-negative float, got {}",
            config.shear_range
        );
        ensure!(
            config.zoom_range.is_finite() && config.zoom_range >= 0.0,
            "zoom_range should be a non-negative float, got {}",
            config.zoom_range
        );
        ensure!(
            config.batch_size > 0,
            "batch_size should be positive, got {}",
            config.batch_size
        );
        ensure!(
            config.cval.is_finite(),
            "cval should be finite, got {}",
            config.cval
        );
        Ok(config)
    }
}

// ============================================================================
// FrameProcessor
// ============================================================================

/// The one-stop shop for sequence augmentation and batch generation.
///
/// Stateless across batches: its only state is the configuration and target
/// frame shape it was constructed with.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    config: AugmentationConfig,
    shape: FrameShape,
}

impl FrameProcessor {
    pub fn new(config: AugmentationConfig, shape: FrameShape) -> Self {
        Self { config, shape }
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Creates an infinite training/validation generator over `mapping`,
    /// drawing randomness from the process-wide source.
    ///
    /// Each pull samples `batch_size` distinct paths without replacement,
    /// assembles each sequence, and applies the enabled transforms in the
    /// fixed order: rotation, shift, shear, zoom, vertical flip, horizontal
    /// flip. `tag` only labels the startup banner.
    pub fn frame_generator(&self, mapping: &LabelMap, tag: &str) -> Result<FrameGenerator> {
        self.frame_generator_with_source(mapping, tag, Box::new(GlobalSource))
    }

    /// [`Self::frame_generator`] with an injected random source, for
    /// reproducible draws.
    pub fn frame_generator_with_source(
        &self,
        mapping: &LabelMap,
        tag: &str,
        source: Box<dyn RandomSource>,
    ) -> Result<FrameGenerator> {
        ensure!(
            mapping.len() >= self.config.batch_size,
            "Cannot sample {} distinct paths from a mapping of {} without replacement",
            self.config.batch_size,
            mapping.len()
        );
        println!(
            "[*] creating a {} generator with {} samples",
            tag,
            mapping.len()
        );

        Ok(FrameGenerator {
            entries: mapping
                .iter()
                .map(|(path, label)| (path.clone(), *label))
                .collect(),
            config: self.config.clone(),
            shape: self.shape,
            source,
        })
    }

    /// Creates an infinite deterministic generator serving one un-augmented
    /// sample per pull, round-robin over the mapping's keys in iteration
    /// order, wrapping after the last key. Used for reproducible evaluation.
    pub fn testing_generator(&self, mapping: &LabelMap, tag: &str) -> Result<TestingGenerator> {
        ensure!(
            !mapping.is_empty(),
            "Cannot create a testing generator over an empty mapping"
        );
        println!(
            "[*] creating a {} testing generator with {} samples",
            tag,
            mapping.len()
        );

        Ok(TestingGenerator {
            entries: mapping
                .iter()
                .map(|(path, label)| (path.clone(), *label))
                .collect(),
            shape: self.shape,
            cursor: 0,
        })
    }
}

// ============================================================================
// FrameGenerator
// ============================================================================

/// Infinite lazy sequence of randomized batches. Restartable only by
/// constructing a new generator; after a failed pull, further pulls are
/// undefined and the caller should treat the instance as dead.
pub struct FrameGenerator {
    entries: Vec<(PathBuf, Label)>,
    config: AugmentationConfig,
    shape: FrameShape,
    source: Box<dyn RandomSource>,
}

impl FrameGenerator {
    fn pull(&mut self) -> Result<Batch> {
        let picked = sample_without_replacement(
            self.config.batch_size,
            self.entries.len(),
            self.source.as_mut(),
        );

        let mut sequences = Vec::with_capacity(picked.len());
        let mut labels = Vec::with_capacity(picked.len());
        let mut paths = Vec::with_capacity(picked.len());

        for index in picked {
            let (path, label) = &self.entries[index];
            let mut sequence = build_sequence(path, self.shape)?;

            if self.config.augments() {
                let cfg = &self.config;
                let rng = self.source.as_mut();

                // Fixed order: rotation, shift, shear, zoom, flips. The order
                // changes the resulting pixel geometry and is part of the
                // contract.
                if cfg.rotation_range > 0 {
                    sequence =
                        sequence_rotation(&sequence, cfg.rotation_range, rng, cfg.fill_mode, cfg.cval);
                }
                if cfg.width_shift_range > 0.0 || cfg.height_shift_range > 0.0 {
                    sequence = sequence_shift(
                        &sequence,
                        cfg.height_shift_range,
                        cfg.width_shift_range,
                        rng,
                        cfg.fill_mode,
                        cfg.cval,
                    );
                }
                if cfg.shear_range > 0.0 {
                    sequence =
                        sequence_shear(&sequence, cfg.shear_range, rng, cfg.fill_mode, cfg.cval);
                }
                if cfg.zoom_range > 0.0 {
                    sequence =
                        sequence_zoom(&sequence, cfg.zoom_range, rng, cfg.fill_mode, cfg.cval);
                }
                // Each flip gets its own independent coin.
                if cfg.vertical_flip && rng.coin_flip() {
                    sequence = sequence_flip(&sequence, FlipAxis::Vertical);
                }
                if cfg.horizontal_flip && rng.coin_flip() {
                    sequence = sequence_flip(&sequence, FlipAxis::Horizontal);
                }
            }

            sequences.push(sequence);
            labels.push(*label);
            paths.push(path.clone());
        }

        Ok(Batch {
            sequences,
            labels,
            paths,
        })
    }
}

impl Iterator for FrameGenerator {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.pull())
    }
}

/// Picks `count` distinct indices from `0..n` via a partial Fisher-Yates
/// driven by the injected source. Caller guarantees `count <= n`.
fn sample_without_replacement(
    count: usize,
    n: usize,
    source: &mut dyn RandomSource,
) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..n).collect();
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let draw = source.uniform(0.0, pool.len() as f32);
        // uniform is inclusive of the upper bound; clamp the edge draw.
        let index = (draw as usize).min(pool.len() - 1);
        picked.push(pool.swap_remove(index));
    }
    picked
}

// ============================================================================
// TestingGenerator
// ============================================================================

/// Infinite deterministic generator: one un-augmented sample per pull,
/// cycling over the mapping's keys in order.
pub struct TestingGenerator {
    entries: Vec<(PathBuf, Label)>,
    shape: FrameShape,
    cursor: usize,
}

impl TestingGenerator {
    fn pull(&mut self) -> Result<Batch> {
        let (path, label) = self.entries[self.cursor].clone();
        self.cursor += 1;
        if self.cursor == self.entries.len() {
            self.cursor = 0;
        }

        println!("{}", path.display());
        let sequence = build_sequence(&path, self.shape)?;
        Ok(Batch {
            sequences: vec![sequence],
            labels: vec![label],
            paths: vec![path],
        })
    }
}

impl Iterator for TestingGenerator {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.pull())
    }
}
