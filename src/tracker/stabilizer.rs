//! Track stabilizer: matching, lifecycle, label locking and anchoring.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::decoder::RawDetection;
use crate::error::Result;
use crate::tracker::config::StabilizerConfig;
use crate::tracker::matching::{self, AssignmentResult, Candidate};
use crate::tracker::output::{CycleOutput, TrackSnapshot};
use crate::tracker::pose::{Camera, GeometryResolver, Pose};
use crate::tracker::track::{Track, TrackId};

pub struct TrackStabilizer {
    /// Live tracks keyed by creation serial, so iteration follows creation order.
    tracks: BTreeMap<u64, Track>,
    frame_id: u64,
    config: StabilizerConfig,
}

impl TrackStabilizer {
    pub fn new(config: StabilizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracks: BTreeMap::new(),
            frame_id: 0,
            config,
        })
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Number of cycles processed since creation or the last reset.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Live tracks in creation order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.values().find(|t| t.id() == id)
    }

    /// Discard every track, returning their ids so markers can be destroyed.
    pub fn reset(&mut self) -> Vec<TrackId> {
        self.frame_id = 0;
        let removed: Vec<TrackId> = std::mem::take(&mut self.tracks)
            .into_values()
            .map(|t| t.id().clone())
            .collect();
        if !removed.is_empty() {
            debug!("Discarded {} tracks", removed.len());
        }
        removed
    }

    /// Run one cycle with the complete detection set for that cycle.
    ///
    /// `camera` orients the emitted markers; without it the last resolved
    /// rotation of each track is emitted instead.
    pub fn update<R>(
        &mut self,
        detections: &[RawDetection],
        resolver: &mut R,
        camera: Option<&Camera>,
    ) -> CycleOutput
    where
        R: GeometryResolver + ?Sized,
    {
        self.frame_id += 1;

        // Step 1: Assume every track misses
        for track in self.tracks.values_mut() {
            track.mark_missed();
        }

        // Step 2: Resolve world poses, dropping detections the resolver misses
        let resolved: Vec<(&RawDetection, Pose)> = detections
            .iter()
            .filter_map(|det| match resolver.resolve(&det.bbox) {
                Some(pose) => Some((det, pose)),
                None => {
                    trace!("No world pose for {} at {:?}", det.label, det.bbox);
                    None
                }
            })
            .collect();

        // Step 3: Match against existing tracks
        let serials: Vec<u64> = self.tracks.keys().copied().collect();
        let track_candidates: Vec<Candidate> = self
            .tracks
            .values()
            .map(|t| Candidate::new(t.last_position, t.class_id()))
            .collect();
        let det_candidates: Vec<Candidate> = resolved
            .iter()
            .map(|(det, pose)| Candidate::new(pose.position, det.class_id))
            .collect();
        let dists = matching::distance_matrix(&track_candidates, &det_candidates);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::assign(
            &dists,
            self.config.position_match_threshold,
            self.config.match_policy,
        );

        for (itracked, idet) in matches {
            let (det, pose) = &resolved[idet];
            if let Some(track) = self.tracks.get_mut(&serials[itracked]) {
                trace!(
                    "Track {} matched {} at distance {:.3}",
                    track.id(),
                    det.label,
                    dists[[itracked, idet]]
                );
                track.update(det.confidence, *pose, &self.config);
            }
        }

        for itracked in unmatched_tracks {
            if let Some(track) = self.tracks.get_mut(&serials[itracked]) {
                track.end_missed_cycle();
            }
        }

        // Step 4: Start tracks for unclaimed detections
        for idet in unmatched_detections {
            let (det, pose) = &resolved[idet];
            let track = Track::new(det, *pose, &self.config);
            debug!(
                "New track {} at {:?} (confidence {:.3})",
                track.id(),
                track.last_position,
                det.confidence
            );
            self.tracks.insert(track.serial(), track);
        }

        // Step 5: Remove expired tracks
        let mut output = CycleOutput::default();
        let config = &self.config;
        self.tracks.retain(|_, track| {
            if track.is_expired(config) {
                debug!(
                    "Track {} removed after {} misses",
                    track.id(),
                    track.consecutive_misses
                );
                output.removed.push(track.id().clone());
                false
            } else {
                true
            }
        });

        // Step 6: Emit visible tracks, holding each at its anchor
        for track in self.tracks.values_mut() {
            if !track.is_visible(config) {
                output.hidden.push(track.id().clone());
                continue;
            }
            let (position, scale) = track.display_pose(config);
            let rotation = camera
                .and_then(|c| c.billboard(&position))
                .unwrap_or(track.last_rotation);
            output.visible.push(TrackSnapshot {
                track_id: track.id().clone(),
                class_id: track.class_id(),
                position,
                rotation,
                scale,
                display_text: track.display_text().to_string(),
                state: track.state(config),
                avg_confidence: track.avg_confidence,
            });
        }

        output
    }
}
