//! Signal classification.

pub mod classifier;

pub use classifier::classify;
