#![cfg(feature = "serde")]

use anchortrack_rs::{DecoderConfig, MatchPolicy, StabilizerConfig, TrackStabilizer};

#[test]
fn test_partial_stabilizer_config_uses_defaults() {
    let config: StabilizerConfig =
        serde_json::from_str(r#"{ "removal_frame_count": 10, "match_policy": "nearest" }"#)
            .unwrap();
    assert_eq!(config.removal_frame_count, 10);
    assert_eq!(config.match_policy, MatchPolicy::Nearest);
    assert_eq!(config.stability_frame_count, 3);
    assert!(TrackStabilizer::new(config).is_ok());
}

#[test]
fn test_decoder_config_allow_list() {
    let config: DecoderConfig =
        serde_json::from_str(r#"{ "confidence_threshold": 0.4, "class_filter": [0, 41] }"#)
            .unwrap();
    assert_eq!(config.class_filter, Some(vec![0, 41]));
    assert_eq!(config.num_classes, 80);
    assert!(config.validate().is_ok());
}

#[test]
fn test_out_of_range_config_rejected_at_construction() {
    let config: StabilizerConfig =
        serde_json::from_str(r#"{ "lock_frame_count": 0 }"#).unwrap();
    assert!(TrackStabilizer::new(config).is_err());
}
