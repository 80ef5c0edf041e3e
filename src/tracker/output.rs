//! Per-cycle stabilizer output and the renderer contract.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::tracker::track::TrackId;
use crate::tracker::track_state::TrackState;

/// What a renderer should draw for one visible track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub track_id: TrackId,
    pub class_id: usize,
    /// Anchor position, or the live position for an unanchored track
    pub position: Point3<f32>,
    /// Billboard rotation facing the camera
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
    pub display_text: String,
    pub state: TrackState,
    pub avg_confidence: f32,
}

/// Everything a renderer needs to reconcile its markers after one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleOutput {
    /// Visible tracks in creation order
    pub visible: Vec<TrackSnapshot>,
    /// Live tracks that must not be shown yet
    pub hidden: Vec<TrackId>,
    /// Tracks deleted this cycle
    pub removed: Vec<TrackId>,
}

impl CycleOutput {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.hidden.is_empty() && self.removed.is_empty()
    }

    pub fn snapshot(&self, id: &TrackId) -> Option<&TrackSnapshot> {
        self.visible.iter().find(|s| &s.track_id == id)
    }

    /// Forward this cycle to a marker sink: removals, then hides, then upserts.
    pub fn apply<S: MarkerSink + ?Sized>(&self, sink: &mut S) {
        for id in &self.removed {
            sink.remove(id);
        }
        for id in &self.hidden {
            sink.hide(id);
        }
        for snapshot in &self.visible {
            sink.upsert(snapshot);
        }
    }
}

/// Receiver of marker updates keyed by track id, typically a renderer.
pub trait MarkerSink {
    /// Create or move the marker for a visible track.
    fn upsert(&mut self, snapshot: &TrackSnapshot);
    /// Keep the marker, if any, but do not draw it.
    fn hide(&mut self, id: &TrackId);
    /// Destroy the marker of a deleted track.
    fn remove(&mut self, id: &TrackId);
}
