//! Persistent world-anchored track.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use nalgebra::{Point3, UnitQuaternion, Vector3, distance};

use crate::decoder::RawDetection;
use crate::tracker::config::StabilizerConfig;
use crate::tracker::pose::Pose;
use crate::tracker::track_state::TrackState;

/// Global creation counter, shared by every stabilizer in the process.
static TRACK_SERIAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reset the global creation counter (useful for testing).
pub fn reset_track_id_counter() {
    TRACK_SERIAL_COUNTER.store(0, Ordering::SeqCst);
}

fn next_serial() -> u64 {
    TRACK_SERIAL_COUNTER.fetch_add(1, Ordering::SeqCst) + 1
}

/// Process-unique track identifier of the form `{label}_{class_id}_{serial}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    fn new(label: &str, class_id: usize, serial: u64) -> Self {
        Self(format!("{label}_{class_id}_{serial}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persistent hypothesis that one real object is being observed.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    serial: u64,
    class_id: usize,
    label: String,

    pub last_position: Point3<f32>,
    pub last_rotation: UnitQuaternion<f32>,
    pub last_scale: Vector3<f32>,

    pub anchor_position: Point3<f32>,
    pub anchor_scale: Vector3<f32>,
    pub has_anchor: bool,

    pub consecutive_detections: u32,
    pub consecutive_misses: u32,
    pub consecutive_high_confidence_frames: u32,

    pub avg_confidence: f32,
    pub last_confidence: f32,

    is_locked: bool,
    locked_label_text: String,
}

impl Track {
    /// Start a track from a detection no existing track claimed.
    pub fn new(detection: &RawDetection, pose: Pose, config: &StabilizerConfig) -> Self {
        let serial = next_serial();
        let high = detection.confidence >= config.lock_confidence_threshold;
        Self {
            id: TrackId::new(&detection.label, detection.class_id, serial),
            serial,
            class_id: detection.class_id,
            label: detection.label.clone(),
            last_position: pose.position,
            last_rotation: pose.rotation,
            last_scale: pose.scale,
            anchor_position: pose.position,
            anchor_scale: pose.scale,
            has_anchor: false,
            consecutive_detections: 1,
            consecutive_misses: 0,
            consecutive_high_confidence_frames: u32::from(high),
            avg_confidence: detection.confidence,
            last_confidence: detection.confidence,
            is_locked: false,
            locked_label_text: String::new(),
        }
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Creation order within the process.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn class_id(&self) -> usize {
        self.class_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn locked_label_text(&self) -> Option<&str> {
        self.is_locked.then_some(self.locked_label_text.as_str())
    }

    /// Text shown on the marker.
    pub fn display_text(&self) -> &str {
        if self.is_locked {
            &self.locked_label_text
        } else {
            &self.label
        }
    }

    pub fn is_visible(&self, config: &StabilizerConfig) -> bool {
        self.consecutive_detections >= config.stability_frame_count
    }

    pub fn is_expired(&self, config: &StabilizerConfig) -> bool {
        self.consecutive_misses >= config.removal_frame_count
    }

    /// Current lifecycle stage.
    ///
    /// The stabilizer drops a track in the cycle it expires, so `Removed` is
    /// only seen on a track driven directly through `mark_missed`.
    pub fn state(&self, config: &StabilizerConfig) -> TrackState {
        if self.is_expired(config) {
            TrackState::Removed
        } else if !self.is_visible(config) {
            TrackState::Unconfirmed
        } else if self.is_locked {
            TrackState::Locked
        } else {
            TrackState::Stable
        }
    }

    /// Count a miss ahead of matching; a hit later in the cycle clears it.
    pub fn mark_missed(&mut self) {
        self.consecutive_misses = self.consecutive_misses.saturating_add(1);
    }

    /// Close a cycle in which no detection claimed this track.
    pub fn end_missed_cycle(&mut self) {
        if !self.is_locked {
            self.consecutive_high_confidence_frames = 0;
        }
    }

    /// Fold a matched detection into the track.
    pub fn update(&mut self, confidence: f32, pose: Pose, config: &StabilizerConfig) {
        self.last_position = pose.position;
        self.last_rotation = pose.rotation;
        self.last_scale = pose.scale;

        self.consecutive_detections = self.consecutive_detections.saturating_add(1);
        self.consecutive_misses = 0;
        self.avg_confidence +=
            (confidence - self.avg_confidence) / self.consecutive_detections as f32;
        self.last_confidence = confidence;

        if !self.has_anchor && self.consecutive_detections >= config.stability_frame_count {
            self.anchor_position = pose.position;
            self.anchor_scale = pose.scale;
            self.has_anchor = true;
            debug!("Track {} anchored at {:?}", self.id, self.anchor_position);
        }

        if self.is_locked {
            return;
        }
        if confidence >= config.lock_confidence_threshold {
            self.consecutive_high_confidence_frames =
                self.consecutive_high_confidence_frames.saturating_add(1);
            if self.consecutive_high_confidence_frames >= config.lock_frame_count {
                self.is_locked = true;
                self.locked_label_text = self.label.clone();
                debug!("Track {} locked as {:?}", self.id, self.locked_label_text);
            }
        } else {
            self.consecutive_high_confidence_frames = 0;
        }
    }

    /// Position and scale to display, snapping the anchor to the live pose
    /// once drift exceeds `movement_update_threshold`.
    ///
    /// Unanchored tracks display their live pose.
    pub fn display_pose(&mut self, config: &StabilizerConfig) -> (Point3<f32>, Vector3<f32>) {
        if !self.has_anchor {
            return (self.last_position, self.last_scale);
        }
        if distance(&self.last_position, &self.anchor_position) > config.movement_update_threshold {
            self.anchor_position = self.last_position;
            self.anchor_scale = self.last_scale;
            debug!("Track {} anchor moved to {:?}", self.id, self.anchor_position);
        }
        (self.anchor_position, self.anchor_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::NormalizedBox;
    use approx::assert_relative_eq;

    fn detection(confidence: f32) -> RawDetection {
        RawDetection::new(NormalizedBox::new(0.5, 0.5, 0.1, 0.1), 41, confidence, "cup")
    }

    fn pose(x: f32) -> Pose {
        Pose::at(Point3::new(x, 0.0, 1.0))
    }

    #[test]
    fn test_new_track() {
        let config = StabilizerConfig::default();
        let track = Track::new(&detection(0.8), pose(0.0), &config);
        assert!(track.id().as_str().starts_with("cup_41_"));
        assert_eq!(track.consecutive_detections, 1);
        assert_eq!(track.consecutive_misses, 0);
        assert_eq!(track.consecutive_high_confidence_frames, 1);
        assert!(!track.has_anchor);
        assert!(!track.is_locked());
        assert_eq!(track.state(&config), TrackState::Unconfirmed);

        let track = Track::new(&detection(0.3), pose(0.0), &config);
        assert_eq!(track.consecutive_high_confidence_frames, 0);
    }

    #[test]
    fn test_serials_increase() {
        let config = StabilizerConfig::default();
        let a = Track::new(&detection(0.5), pose(0.0), &config);
        let b = Track::new(&detection(0.5), pose(0.0), &config);
        assert!(b.serial() > a.serial());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_running_average() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.4), pose(0.0), &config);
        track.update(0.6, pose(0.0), &config);
        track.update(0.8, pose(0.0), &config);
        assert_relative_eq!(track.avg_confidence, 0.6, epsilon = 1e-6);
        assert_relative_eq!(track.last_confidence, 0.8);
    }

    #[test]
    fn test_anchor_set_once() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.5), pose(0.0), &config);
        track.update(0.5, pose(0.01), &config);
        assert!(!track.has_anchor);
        track.update(0.5, pose(0.02), &config);
        assert!(track.has_anchor);
        assert_eq!(track.anchor_position, Point3::new(0.02, 0.0, 1.0));
        track.update(0.5, pose(0.05), &config);
        assert_eq!(track.anchor_position, Point3::new(0.02, 0.0, 1.0));
    }

    #[test]
    fn test_display_pose_hysteresis() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.5), pose(0.0), &config);
        track.update(0.5, pose(0.0), &config);
        track.update(0.5, pose(0.0), &config);

        track.update(0.5, pose(0.05), &config);
        let (position, _) = track.display_pose(&config);
        assert_eq!(position, Point3::new(0.0, 0.0, 1.0));

        track.update(0.5, pose(0.25), &config);
        let (position, _) = track.display_pose(&config);
        assert_eq!(position, Point3::new(0.25, 0.0, 1.0));
        assert_eq!(track.anchor_position, Point3::new(0.25, 0.0, 1.0));
    }

    #[test]
    fn test_lock_freezes_label() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.8), pose(0.0), &config);
        track.update(0.8, pose(0.0), &config);
        assert!(!track.is_locked());
        track.update(0.8, pose(0.0), &config);
        assert!(track.is_locked());
        assert_eq!(track.locked_label_text(), Some("cup"));
        assert_eq!(track.state(&config), TrackState::Locked);

        track.update(0.1, pose(0.0), &config);
        track.mark_missed();
        track.end_missed_cycle();
        assert!(track.is_locked());
        assert_eq!(track.display_text(), "cup");
        assert_eq!(track.consecutive_high_confidence_frames, 3);
    }

    #[test]
    fn test_miss_resets_unlocked_streak() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.8), pose(0.0), &config);
        track.update(0.8, pose(0.0), &config);
        track.mark_missed();
        track.end_missed_cycle();
        assert_eq!(track.consecutive_high_confidence_frames, 0);
        assert_eq!(track.consecutive_misses, 1);
    }

    #[test]
    fn test_removed_after_removal_frame_count_misses() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.8), pose(0.0), &config);
        for _ in 1..config.removal_frame_count {
            track.mark_missed();
        }
        assert!(!track.is_expired(&config));
        assert_eq!(track.state(&config), TrackState::Unconfirmed);

        track.mark_missed();
        assert!(track.is_expired(&config));
        assert_eq!(track.state(&config), TrackState::Removed);
    }

    #[test]
    fn test_counters_saturate() {
        let config = StabilizerConfig::default();
        let mut track = Track::new(&detection(0.8), pose(0.0), &config);
        track.consecutive_misses = u32::MAX;
        track.mark_missed();
        assert_eq!(track.consecutive_misses, u32::MAX);

        track.consecutive_detections = u32::MAX;
        track.consecutive_high_confidence_frames = u32::MAX;
        track.update(0.8, pose(0.0), &config);
        assert_eq!(track.consecutive_detections, u32::MAX);
        assert_eq!(track.consecutive_high_confidence_frames, u32::MAX);
        assert_eq!(track.consecutive_misses, 0);
        assert!(track.is_locked());
        assert!(track.avg_confidence.is_finite());
    }
}
