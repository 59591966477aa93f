//! Geometric transforms applied coherently across whole frame sequences.
//!
//! The affine machinery lives in [`affine`]; the sequence-level transforms
//! (one random draw, every frame warped with the same matrix) live in
//! [`geometric`].

pub mod affine;
pub mod geometric;

pub use affine::{warp_frame, Affine, FillMode};
pub use geometric::{
    sequence_flip, sequence_rotation, sequence_shear, sequence_shift, sequence_zoom, FlipAxis,
};
