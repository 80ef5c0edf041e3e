//! Pipeline combining tensor decoding with track stabilization.

use ndarray::ArrayViewD;

use crate::decoder::YoloDecoder;
use crate::tracker::{Camera, CycleOutput, GeometryResolver, TrackId, TrackStabilizer};

use super::TensorSource;

/// A per-session pipeline that bundles a tensor source, the decoder and the
/// stabilizer.
///
/// Call [`process_cycle`](Self::process_cycle) once per frame. Cycles without
/// a completed tensor leave the tracks untouched.
pub struct Pipeline<S: TensorSource> {
    source: S,
    decoder: YoloDecoder,
    stabilizer: TrackStabilizer,
}

impl<S: TensorSource> Pipeline<S> {
    pub fn new(source: S, decoder: YoloDecoder, stabilizer: TrackStabilizer) -> Self {
        Self {
            source,
            decoder,
            stabilizer,
        }
    }

    /// Poll the source and, if a tensor is ready, decode and stabilize it.
    ///
    /// # Returns
    /// `Ok(None)` when no completed tensor was available this cycle.
    pub fn process_cycle<R>(
        &mut self,
        resolver: &mut R,
        camera: Option<&Camera>,
    ) -> Result<Option<CycleOutput>, S::Error>
    where
        R: GeometryResolver + ?Sized,
    {
        let Some(tensor) = self.source.poll_output()? else {
            return Ok(None);
        };
        Ok(Some(self.process_tensor(tensor.view(), resolver, camera)))
    }

    /// Decode and stabilize a tensor obtained outside the source.
    pub fn process_tensor<R>(
        &mut self,
        tensor: ArrayViewD<'_, f32>,
        resolver: &mut R,
        camera: Option<&Camera>,
    ) -> CycleOutput
    where
        R: GeometryResolver + ?Sized,
    {
        let detections = self.decoder.decode(tensor);
        self.stabilizer.update(&detections, resolver, camera)
    }

    /// End the session: all tracks are dropped without a final cycle.
    ///
    /// # Returns
    /// The ids of the discarded tracks, for marker cleanup.
    pub fn stop(&mut self) -> Vec<TrackId> {
        self.stabilizer.reset()
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn decoder(&self) -> &YoloDecoder {
        &self.decoder
    }

    /// Get a reference to the underlying stabilizer.
    pub fn stabilizer(&self) -> &TrackStabilizer {
        &self.stabilizer
    }

    /// Get a mutable reference to the underlying stabilizer.
    pub fn stabilizer_mut(&mut self) -> &mut TrackStabilizer {
        &mut self.stabilizer
    }
}
