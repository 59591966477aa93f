pub mod frame;
pub mod loader;
pub mod processor;
pub mod rng;
pub mod sequence;
pub mod threadsafe;
pub mod transforms;

pub use frame::{Batch, Frame, FrameShape, Label, Sequence};
pub use processor::{AugmentationConfig, AugmentationConfigBuilder, FrameProcessor, LabelMap};
pub use threadsafe::ThreadSafeIterator;
