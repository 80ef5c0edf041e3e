//! Tensor source backed by a Burn model.
//!
//! Frames are pushed with [`BurnTensorSource::submit`]; the head output is
//! copied into an `ndarray` tensor and handed to the pipeline on the next
//! poll.
//!
//! # Example
//!
//! ```ignore
//! use anchortrack_rs::integration::{BurnModel, BurnTensorSource};
//! use burn::backend::NdArray;
//!
//! struct Yolo11n { /* weights */ }
//!
//! impl BurnModel<NdArray> for Yolo11n {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> burn::tensor::Tensor<NdArray, 3> {
//!         // [1, 84, 8400]
//!     }
//! }
//!
//! let mut source = BurnTensorSource::new(Yolo11n::load("yolo11n.mpk"), Default::default());
//! source.submit(&chw_frame, 640, 640)?;
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use ndarray::{ArrayD, IxDyn};
use thiserror::Error;

use super::TensorSource;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BurnSourceError {
    #[error("frame is {got:?}, model expects {expected:?} (width, height)")]
    FrameResolution {
        expected: (u32, u32),
        got: (u32, u32),
    },
    #[error("frame holds {got} bytes, expected {expected}")]
    FrameLength { expected: usize, got: usize },
    #[error("cannot read model output back: {0}")]
    Readback(String),
}

/// A detection model runnable on a Burn backend.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Map a `[1, C, H, W]` frame to the raw detection head. Any layout the
    /// decoder accepts is fine, typically `[1, 4 + classes, slots]`.
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 3>;

    /// `(channels, height, width)` of the frames the model takes.
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640)
    }
}

/// [`TensorSource`] holding the output of the last submitted frame.
pub struct BurnTensorSource<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    pending: Option<ArrayD<f32>>,
}

impl<B: Backend, M: BurnModel<B>> BurnTensorSource<B, M> {
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            pending: None,
        }
    }

    /// Scale a planar CHW `u8` frame into a `[1, C, H, W]` tensor in `[0, 1]`.
    pub fn frame_tensor(
        &self,
        frame: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Tensor<B, 4>, BurnSourceError> {
        let (channels, model_h, model_w) = self.model.input_size();
        if (width, height) != (model_w, model_h) {
            return Err(BurnSourceError::FrameResolution {
                expected: (model_w, model_h),
                got: (width, height),
            });
        }
        let shape = [1, channels as usize, height as usize, width as usize];
        let expected: usize = shape.iter().product();
        if frame.len() != expected {
            return Err(BurnSourceError::FrameLength {
                expected,
                got: frame.len(),
            });
        }

        let scaled: Vec<f32> = frame.iter().map(|&v| f32::from(v) / 255.0).collect();
        Ok(Tensor::<B, 1>::from_floats(scaled.as_slice(), &self.device).reshape(shape))
    }

    /// Run the model on one frame. Its output replaces any tensor not yet
    /// polled.
    pub fn submit(&mut self, frame: &[u8], width: u32, height: u32) -> Result<(), BurnSourceError> {
        let input = self.frame_tensor(frame, width, height)?;
        let head = self.model.forward(input);
        self.pending = Some(head_to_ndarray(head)?);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_some()
    }
}

fn head_to_ndarray<B: Backend>(head: Tensor<B, 3>) -> Result<ArrayD<f32>, BurnSourceError> {
    let dims = head.dims();
    let values = head
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| BurnSourceError::Readback(format!("{e:?}")))?;
    ArrayD::from_shape_vec(IxDyn(&dims), values)
        .map_err(|e| BurnSourceError::Readback(e.to_string()))
}

impl<B: Backend, M: BurnModel<B>> TensorSource for BurnTensorSource<B, M> {
    type Error = BurnSourceError;

    fn poll_output(&mut self) -> Result<Option<ArrayD<f32>>, Self::Error> {
        Ok(self.pending.take())
    }
}
