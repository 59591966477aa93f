use crate::frame::Frame;
use ndarray::Array3;

// ============================================================================
// Affine
// ============================================================================

/// A 3x3 affine transform on homogeneous `(row, col, 1)` coordinates.
///
/// The matrix maps *output* pixel coordinates to *input* sampling
/// coordinates (inverse warping), so composing and applying one matrix per
/// sequence keeps every frame pixel-identical under the same draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    m: [[f32; 3]; 3],
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation by `theta` radians about the origin.
    pub fn rotation(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Translation by `tx` rows and `ty` columns.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]],
        }
    }

    /// Shear by `angle` radians.
    pub fn shear(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[1.0, -sin, 0.0], [0.0, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Independent scaling of the row and column axes.
    pub fn zoom(zx: f32, zy: f32) -> Self {
        Self {
            m: [[zx, 0.0, 0.0], [0.0, zy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Matrix product `self * other`.
    pub fn matmul(&self, other: &Affine) -> Affine {
        let mut out = [[0.0f32; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Affine { m: out }
    }

    /// Re-centers the transform so it pivots on the frame center instead of
    /// the origin: translate the center to the origin, apply `self`,
    /// translate back.
    pub fn offset_center(self, height: usize, width: usize) -> Affine {
        let ox = height as f32 / 2.0 + 0.5;
        let oy = width as f32 / 2.0 + 0.5;
        Affine::translation(ox, oy)
            .matmul(&self)
            .matmul(&Affine::translation(-ox, -oy))
    }

    /// Maps an output `(row, col)` to input sampling coordinates.
    pub fn apply(&self, row: f32, col: f32) -> (f32, f32) {
        (
            self.m[0][0] * row + self.m[0][1] * col + self.m[0][2],
            self.m[1][0] * row + self.m[1][1] * col + self.m[1][2],
        )
    }
}

// ============================================================================
// FillMode
// ============================================================================

/// Policy for pixels whose sampling coordinates fall outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Extend the nearest edge pixel.
    #[default]
    Nearest,
    /// Fill with a constant value supplied alongside the mode.
    Constant,
    /// Mirror the frame at its boundary.
    Reflect,
    /// Tile the frame periodically.
    Wrap,
}

/// Resolves an out-of-range index for one axis, or `None` when the mode is
/// `Constant` and the pixel should take the fill value.
fn resolve_index(index: isize, len: usize, mode: FillMode) -> Option<usize> {
    let len_i = len as isize;
    if (0..len_i).contains(&index) {
        return Some(index as usize);
    }
    match mode {
        FillMode::Nearest => Some(index.clamp(0, len_i - 1) as usize),
        FillMode::Constant => None,
        FillMode::Reflect => {
            // Mirror without repeating the edge period: period is 2 * len.
            let period = 2 * len_i;
            let mut idx = index.rem_euclid(period);
            if idx >= len_i {
                idx = period - 1 - idx;
            }
            Some(idx as usize)
        }
        FillMode::Wrap => Some(index.rem_euclid(len_i) as usize),
    }
}

// ============================================================================
// warp_frame
// ============================================================================

/// Applies an affine transform to a single frame by inverse mapping with
/// nearest-neighbour sampling.
///
/// Each output pixel `(i, j)` samples the input at `matrix.apply(i, j)`
/// rounded to the nearest integer coordinate; out-of-bounds samples are
/// resolved by `fill` (with `cval` for [`FillMode::Constant`]).
pub fn warp_frame(frame: &Frame, matrix: &Affine, fill: FillMode, cval: f32) -> Frame {
    let (height, width, channels) = frame.dim();
    let mut out = Array3::zeros((height, width, channels));

    for i in 0..height {
        for j in 0..width {
            let (si, sj) = matrix.apply(i as f32, j as f32);
            let si = si.round() as isize;
            let sj = sj.round() as isize;

            let source = match (
                resolve_index(si, height, fill),
                resolve_index(sj, width, fill),
            ) {
                (Some(r), Some(c)) => Some((r, c)),
                _ => None,
            };

            for k in 0..channels {
                out[[i, j, k]] = match source {
                    Some((r, c)) => frame[[r, c, k]],
                    None => cval,
                };
            }
        }
    }
    out
}
