//! Integration module for connecting inference backends and renderers with
//! the decoder and stabilizer.
//!
//! This module provides traits and utilities for handing completed output
//! tensors (Burn, ONNX Runtime, etc.) to a per-session [`Pipeline`].

mod builder;
mod pipeline;
mod source;

pub use builder::RawDetectionBuilder;
pub use pipeline::Pipeline;
pub use source::{TensorSlot, TensorSource};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnModel, BurnSourceError, BurnTensorSource};
