//! Sequence-coherent randomized transforms.
//!
//! Every function here draws its random parameter **once** per invocation and
//! applies the resulting matrix to all frames in the sequence, so temporal
//! consistency is preserved across the sample. Parameter validation happens
//! in the configuration layer, not here.

use crate::frame::Sequence;
use crate::rng::RandomSource;
use crate::transforms::affine::{warp_frame, Affine, FillMode};
use ndarray::Axis;

// ============================================================================
// Rotation
// ============================================================================

/// Rotates every frame by one angle drawn uniformly from
/// `[-rotation_range, rotation_range]` degrees, pivoting on the frame center.
pub fn sequence_rotation(
    seq: &Sequence,
    rotation_range: u32,
    rng: &mut dyn RandomSource,
    fill: FillMode,
    cval: f32,
) -> Sequence {
    if seq.is_empty() {
        return Vec::new();
    }

    let range = rotation_range as f32;
    let theta = rng.uniform(-range, range).to_radians();
    let (height, width, _) = seq[0].dim();
    let matrix = Affine::rotation(theta).offset_center(height, width);
    seq.iter()
        .map(|frame| warp_frame(frame, &matrix, fill, cval))
        .collect()
}

// ============================================================================
// Shift
// ============================================================================

/// Translates every frame by one draw: rows by a fraction of the height from
/// `[-height_shift_range, height_shift_range]`, columns by a fraction of the
/// width from `[-width_shift_range, width_shift_range]`. No center offset is
/// needed for a pure translation.
pub fn sequence_shift(
    seq: &Sequence,
    height_shift_range: f32,
    width_shift_range: f32,
    rng: &mut dyn RandomSource,
    fill: FillMode,
    cval: f32,
) -> Sequence {
    if seq.is_empty() {
        return Vec::new();
    }

    let (height, width, _) = seq[0].dim();
    let tx = rng.uniform(-height_shift_range, height_shift_range) * height as f32;
    let ty = rng.uniform(-width_shift_range, width_shift_range) * width as f32;

    let matrix = Affine::translation(tx, ty);
    seq.iter()
        .map(|frame| warp_frame(frame, &matrix, fill, cval))
        .collect()
}

// ============================================================================
// Shear
// ============================================================================

/// Shears every frame by one angle drawn uniformly from
/// `[-shear_range, shear_range]` degrees, pivoting on the frame center.
pub fn sequence_shear(
    seq: &Sequence,
    shear_range: f32,
    rng: &mut dyn RandomSource,
    fill: FillMode,
    cval: f32,
) -> Sequence {
    if seq.is_empty() {
        return Vec::new();
    }

    let shear = rng.uniform(-shear_range, shear_range).to_radians();
    let (height, width, _) = seq[0].dim();
    let matrix = Affine::shear(shear).offset_center(height, width);
    seq.iter()
        .map(|frame| warp_frame(frame, &matrix, fill, cval))
        .collect()
}

// ============================================================================
// Zoom
// ============================================================================

/// Scales every frame by one `(zx, zy)` pair drawn independently from
/// `[1 - zoom_range, 1 + zoom_range]`, pivoting on the frame center.
///
/// `zoom_range == 0.0` is the identity: the sampling interval would be
/// zero-width, so no draw is made and the input is returned unchanged.
pub fn sequence_zoom(
    seq: &Sequence,
    zoom_range: f32,
    rng: &mut dyn RandomSource,
    fill: FillMode,
    cval: f32,
) -> Sequence {
    if zoom_range == 0.0 || seq.is_empty() {
        return seq.clone();
    }

    let (zx, zy) = rng.uniform_pair(1.0 - zoom_range, 1.0 + zoom_range);
    let (height, width, _) = seq[0].dim();
    let matrix = Affine::zoom(zx, zy).offset_center(height, width);
    seq.iter()
        .map(|frame| warp_frame(frame, &matrix, fill, cval))
        .collect()
}

// ============================================================================
// Flip
// ============================================================================

/// Spatial axis of a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Reverse the row axis (top becomes bottom).
    Vertical,
    /// Reverse the column axis (left becomes right).
    Horizontal,
}

/// Reverses every frame along the given spatial axis.
///
/// Deterministic: whether to flip at all is the caller's coin flip.
pub fn sequence_flip(seq: &Sequence, axis: FlipAxis) -> Sequence {
    let array_axis = match axis {
        FlipAxis::Vertical => Axis(0),
        FlipAxis::Horizontal => Axis(1),
    };
    seq.iter()
        .map(|frame| {
            let mut flipped = frame.clone();
            flipped.invert_axis(array_axis);
            flipped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::rng::{RandomSource, SeededSource};
    use ndarray::Array3;

    fn gradient_frame(height: usize, width: usize) -> Frame {
        Array3::from_shape_fn((height, width, 1), |(i, j, _)| (i * width + j) as f32)
    }

    /// Source that always returns the midpoint of the requested interval.
    struct MidpointSource;

    impl RandomSource for MidpointSource {
        fn uniform(&mut self, low: f32, high: f32) -> f32 {
            (low + high) / 2.0
        }
    }

    #[test]
    fn rotation_applies_one_draw_to_every_frame() {
        // Two identical frames must come out identical: same matrix.
        let seq = vec![gradient_frame(6, 6), gradient_frame(6, 6)];
        let mut rng = SeededSource::new(42);
        let rotated = sequence_rotation(&seq, 30, &mut rng, FillMode::Nearest, 0.0);

        assert_eq!(rotated.len(), 2);
        assert_eq!(rotated[0], rotated[1]);
    }

    #[test]
    fn rotation_matches_manually_built_matrix() {
        let seq = vec![gradient_frame(6, 6)];
        let mut rng = SeededSource::new(7);
        let rotated = sequence_rotation(&seq, 45, &mut rng, FillMode::Nearest, 0.0);

        let mut replay = SeededSource::new(7);
        let theta = replay.uniform(-45.0, 45.0).to_radians();
        let matrix = Affine::rotation(theta).offset_center(6, 6);
        let expected = warp_frame(&seq[0], &matrix, FillMode::Nearest, 0.0);
        assert_eq!(rotated[0], expected);
    }

    #[test]
    fn shift_is_coherent_across_frames() {
        let seq = vec![gradient_frame(8, 4), gradient_frame(8, 4)];
        let mut rng = SeededSource::new(3);
        let shifted = sequence_shift(&seq, 0.5, 0.25, &mut rng, FillMode::Nearest, 0.0);
        assert_eq!(shifted[0], shifted[1]);
    }

    #[test]
    fn shift_with_midpoint_draw_is_identity() {
        // Midpoint of [-r, r] is 0: zero translation.
        let seq = vec![gradient_frame(4, 4)];
        let mut rng = MidpointSource;
        let shifted = sequence_shift(&seq, 1.0, 1.0, &mut rng, FillMode::Nearest, 0.0);
        assert_eq!(shifted[0], seq[0]);
    }

    #[test]
    fn shear_is_coherent_across_frames() {
        let seq = vec![gradient_frame(6, 6), gradient_frame(6, 6)];
        let mut rng = SeededSource::new(11);
        let sheared = sequence_shear(&seq, 20.0, &mut rng, FillMode::Nearest, 0.0);
        assert_eq!(sheared[0], sheared[1]);
    }

    #[test]
    fn zoom_zero_range_is_exact_identity() {
        let seq = vec![gradient_frame(5, 7), gradient_frame(5, 7)];
        let mut rng = SeededSource::new(42);
        let zoomed = sequence_zoom(&seq, 0.0, &mut rng, FillMode::Nearest, 0.0);
        assert_eq!(zoomed, seq);

        // And no draw was consumed: the next uniform matches a fresh source.
        let mut fresh = SeededSource::new(42);
        assert_eq!(rng.uniform(0.0, 1.0), fresh.uniform(0.0, 1.0));
    }

    #[test]
    fn zoom_is_coherent_across_frames() {
        let seq = vec![gradient_frame(6, 6), gradient_frame(6, 6)];
        let mut rng = SeededSource::new(5);
        let zoomed = sequence_zoom(&seq, 0.3, &mut rng, FillMode::Nearest, 0.0);
        assert_eq!(zoomed[0], zoomed[1]);
    }

    #[test]
    fn flip_twice_restores_the_sequence() {
        let seq = vec![gradient_frame(3, 4), gradient_frame(3, 4)];
        for axis in [FlipAxis::Vertical, FlipAxis::Horizontal] {
            let twice = sequence_flip(&sequence_flip(&seq, axis), axis);
            assert_eq!(twice, seq);
        }
    }

    #[test]
    fn vertical_flip_reverses_rows() {
        let seq = vec![gradient_frame(3, 2)];
        let flipped = sequence_flip(&seq, FlipAxis::Vertical);
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(flipped[0][[i, j, 0]], seq[0][[2 - i, j, 0]]);
            }
        }
    }

    #[test]
    fn horizontal_flip_reverses_columns() {
        let seq = vec![gradient_frame(2, 3)];
        let flipped = sequence_flip(&seq, FlipAxis::Horizontal);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(flipped[0][[i, j, 0]], seq[0][[i, 2 - j, 0]]);
            }
        }
    }

    #[test]
    fn empty_sequences_pass_through() {
        let empty: Sequence = Vec::new();
        let mut rng = SeededSource::new(0);
        assert!(sequence_rotation(&empty, 10, &mut rng, FillMode::Nearest, 0.0).is_empty());
        assert!(sequence_shift(&empty, 0.1, 0.1, &mut rng, FillMode::Nearest, 0.0).is_empty());
        assert!(sequence_shear(&empty, 5.0, &mut rng, FillMode::Nearest, 0.0).is_empty());
        assert!(sequence_zoom(&empty, 0.2, &mut rng, FillMode::Nearest, 0.0).is_empty());
        assert!(sequence_flip(&empty, FlipAxis::Vertical).is_empty());
    }
}
