use crate::error::{Error, Result};

/// How detections claim existing tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchPolicy {
    /// Each detection, in order, takes the oldest unclaimed track in range.
    #[default]
    FirstFit,
    /// All in-range pairs are committed by ascending distance.
    Nearest,
}

/// Configuration for the [`TrackStabilizer`](crate::tracker::TrackStabilizer).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StabilizerConfig {
    /// Maximum world distance (meters, exclusive) for a detection to match a track.
    pub position_match_threshold: f32,
    /// Hits needed before a track is shown and anchored.
    pub stability_frame_count: u32,
    /// Consecutive misses after which a track is deleted.
    pub removal_frame_count: u32,
    /// Confidence at or above which a hit extends the lock streak.
    pub lock_confidence_threshold: f32,
    /// Streak length that freezes the displayed label.
    pub lock_frame_count: u32,
    /// Drift (meters, exclusive) beyond which the anchor follows the live pose.
    pub movement_update_threshold: f32,
    pub match_policy: MatchPolicy,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            position_match_threshold: 0.2,
            stability_frame_count: 3,
            removal_frame_count: 5,
            lock_confidence_threshold: 0.7,
            lock_frame_count: 3,
            movement_update_threshold: 0.1,
            match_policy: MatchPolicy::FirstFit,
        }
    }
}

impl StabilizerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, count) in [
            ("stability_frame_count", self.stability_frame_count),
            ("removal_frame_count", self.removal_frame_count),
            ("lock_frame_count", self.lock_frame_count),
        ] {
            if count == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }

        if !(0.0..=1.0).contains(&self.lock_confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "lock_confidence_threshold must be within [0, 1], got {}",
                self.lock_confidence_threshold
            )));
        }

        for (name, distance) in [
            ("position_match_threshold", self.position_match_threshold),
            ("movement_update_threshold", self.movement_update_threshold),
        ] {
            if !(distance.is_finite() && distance >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative distance, got {distance}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(StabilizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_frame_counts_rejected() {
        let config = StabilizerConfig {
            removal_frame_count: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::InvalidConfig(
                "removal_frame_count must be at least 1".to_string()
            ))
        );
    }

    #[test]
    fn test_out_of_range_thresholds_rejected() {
        let config = StabilizerConfig {
            lock_confidence_threshold: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StabilizerConfig {
            position_match_threshold: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StabilizerConfig {
            movement_update_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
