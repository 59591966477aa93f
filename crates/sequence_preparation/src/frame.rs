use anyhow::{ensure, Result};
use ndarray::{s, Array2, Array3, Array5};
use std::path::PathBuf;

/// A single decoded frame: `(height, width, channels)` f32 tensor with
/// values in `[0.0, 1.0]`.
pub type Frame = Array3<f32>;

/// An ordered list of frames belonging to one sample, in frame-index order.
/// All frames in a sequence share the same `(H, W, C)` shape.
pub type Sequence = Vec<Frame>;

/// Target decoded shape of every frame: `(height, width, channels)`.
///
/// # Example
/// ```ignore
/// let shape = FrameShape::new(224, 224, 3)?;   // explicit
/// let shape = FrameShape::default();           // 224x224x3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameShape {
    /// Creates a validated frame shape. Dimensions must be positive and
    /// `channels` must be 1 (grayscale) or 3 (RGB).
    pub fn new(height: usize, width: usize, channels: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "Frame dimensions must be positive (got {}x{})",
            height,
            width
        );
        ensure!(
            channels == 1 || channels == 3,
            "Frame channels must be 1 or 3 (got {})",
            channels
        );
        Ok(Self {
            height,
            width,
            channels,
        })
    }
}

impl Default for FrameShape {
    fn default() -> Self {
        Self {
            height: 224,
            width: 224,
            channels: 3,
        }
    }
}

/// The regression target associated with one sample directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub heart_rate: f32,
    pub respiration_rate: f32,
}

impl Label {
    pub fn new(heart_rate: f32, respiration_rate: f32) -> Self {
        Self {
            heart_rate,
            respiration_rate,
        }
    }
}

/// One generator pull: `batch_size` sequences with their labels in the same
/// order (`labels[i]` belongs to `sequences[i]`, which came from `paths[i]`).
///
/// The batch is owned by the caller; the generator keeps no reference to it.
#[derive(Debug, Clone)]
pub struct Batch {
    pub sequences: Vec<Sequence>,
    pub labels: Vec<Label>,
    pub paths: Vec<PathBuf>,
}

impl Batch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Stacks the batch into a `(batch, seq_len, H, W, C)` tensor.
    ///
    /// Fails if the batch is empty or the sequences disagree on length or
    /// frame shape, since a ragged batch cannot be handed to a model as one
    /// tensor.
    pub fn stack(&self) -> Result<Array5<f32>> {
        ensure!(!self.sequences.is_empty(), "Cannot stack an empty batch");
        let seq_len = self.sequences[0].len();
        ensure!(seq_len > 0, "Cannot stack a batch of empty sequences");
        let dim = self.sequences[0][0].dim();

        for (i, sequence) in self.sequences.iter().enumerate() {
            ensure!(
                sequence.len() == seq_len,
                "Sequence {} has {} frames, expected {}",
                i,
                sequence.len(),
                seq_len
            );
            for (j, frame) in sequence.iter().enumerate() {
                ensure!(
                    frame.dim() == dim,
                    "Frame {} of sequence {} has shape {:?}, expected {:?}",
                    j,
                    i,
                    frame.dim(),
                    dim
                );
            }
        }

        let (h, w, c) = dim;
        let mut stacked = Array5::<f32>::zeros((self.sequences.len(), seq_len, h, w, c));
        for (i, sequence) in self.sequences.iter().enumerate() {
            for (j, frame) in sequence.iter().enumerate() {
                stacked.slice_mut(s![i, j, .., .., ..]).assign(frame);
            }
        }
        Ok(stacked)
    }

    /// Labels as a `(batch, 2)` tensor: column 0 = heart rate, column 1 =
    /// respiration rate.
    pub fn labels_array(&self) -> Array2<f32> {
        Array2::from_shape_fn((self.labels.len(), 2), |(i, j)| {
            if j == 0 {
                self.labels[i].heart_rate
            } else {
                self.labels[i].respiration_rate
            }
        })
    }
}
