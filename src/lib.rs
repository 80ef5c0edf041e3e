//! Decoding of YOLO detection-head tensors and stabilization of the
//! resulting detections into world-anchored tracks.
//!
//! Each cycle, [`YoloDecoder`] turns one output tensor into
//! [`RawDetection`]s and [`TrackStabilizer`] folds them into persistent
//! tracks: new tracks stay hidden until they have been seen
//! `stability_frame_count` times, labels lock after a sustained
//! high-confidence streak, displayed positions only move once drift exceeds
//! `movement_update_threshold`, and tracks are dropped after
//! `removal_frame_count` consecutive misses.

pub mod catalog;
pub mod decoder;
pub mod error;
pub mod integration;
pub mod tracker;

pub use catalog::ClassCatalog;
pub use decoder::{DecoderConfig, NormalizedBox, RawDetection, YoloDecoder};
pub use error::{Error, Result};
pub use integration::{Pipeline, RawDetectionBuilder, TensorSlot, TensorSource};
pub use tracker::{
    Camera, CycleOutput, GeometryResolver, MarkerSink, MatchPolicy, Pose, StabilizerConfig,
    TrackSnapshot, TrackStabilizer, TrackState,
};
