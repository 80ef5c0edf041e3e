//! Handoff of completed output tensors from inference to the pipeline.

use crossbeam_channel::{Receiver, TryRecvError};
use ndarray::ArrayD;

use crate::error::Error;

/// Producer side of the pipeline: publishes complete output tensors only.
///
/// Inference that spans several cycles simply returns `Ok(None)` until its
/// tensor is finished; the pipeline skips decoding and stabilizing for those
/// cycles.
///
/// # Example
///
/// ```ignore
/// use anchortrack_rs::TensorSource;
/// use ndarray::ArrayD;
///
/// struct MyRuntime {
///     // Your inference session here
/// }
///
/// impl TensorSource for MyRuntime {
///     type Error = std::io::Error;
///
///     fn poll_output(&mut self) -> Result<Option<ArrayD<f32>>, Self::Error> {
///         // Return the output once the time-sliced run has completed
///         Ok(None)
///     }
/// }
/// ```
pub trait TensorSource {
    /// Error type for inference failures.
    type Error;

    /// Take the latest completed tensor, if one is ready.
    fn poll_output(&mut self) -> Result<Option<ArrayD<f32>>, Self::Error>;
}

/// Single-slot handoff for inference running on the same thread.
///
/// Publishing replaces any tensor that was not consumed yet.
#[derive(Debug, Clone, Default)]
pub struct TensorSlot {
    pending: Option<ArrayD<f32>>,
}

impl TensorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, tensor: ArrayD<f32>) {
        self.pending = Some(tensor);
    }

    pub fn is_ready(&self) -> bool {
        self.pending.is_some()
    }
}

impl TensorSource for TensorSlot {
    type Error = std::convert::Infallible;

    fn poll_output(&mut self) -> Result<Option<ArrayD<f32>>, Self::Error> {
        Ok(self.pending.take())
    }
}

/// Tensors produced on an inference thread. Stale tensors are skipped so
/// each cycle works on the newest output.
impl TensorSource for Receiver<ArrayD<f32>> {
    type Error = Error;

    fn poll_output(&mut self) -> Result<Option<ArrayD<f32>>, Self::Error> {
        let mut latest = None;
        loop {
            match self.try_recv() {
                Ok(tensor) => latest = Some(tensor),
                Err(TryRecvError::Empty) => return Ok(latest),
                Err(TryRecvError::Disconnected) => {
                    return match latest {
                        Some(tensor) => Ok(Some(tensor)),
                        None => Err(Error::SourceDisconnected),
                    };
                }
            }
        }
    }
}
