//! Tests for path comparison, status codes and mode formatting

use super::{mode, path_info};
use crate::types::{
    AdapterId, DisplayChangeStatus, ModeFields, Orientation, PathFields, VideoMode,
};

#[test]
fn test_path_matches_with_volatile_fields() {
    let stored = path_info(0, 256);
    let after_switch = path_info(1, 256);

    assert!(!stored.matches(&after_switch, PathFields::empty()));
    assert!(stored.matches(&after_switch, PathFields::SOURCE));
    assert!(stored.matches(&after_switch, PathFields::SOURCE | PathFields::TARGET));
    assert!(!stored.matches(&path_info(1, 300), PathFields::SOURCE));
}

#[test]
fn test_path_matches_never_ignores_adapter_unless_asked() {
    let mut other_adapter = path_info(0, 256);
    other_adapter.adapter_id = AdapterId { low: 0x9999, high: 0 };

    assert!(!path_info(0, 256).matches(&other_adapter, PathFields::SOURCE | PathFields::TARGET));
    assert!(path_info(0, 256).matches(&other_adapter, PathFields::ADAPTER));
}

#[test]
fn test_change_status_codes() {
    assert_eq!(DisplayChangeStatus::from(0), DisplayChangeStatus::Successful);
    assert_eq!(DisplayChangeStatus::from(1), DisplayChangeStatus::Restart);
    assert_eq!(DisplayChangeStatus::from(-2), DisplayChangeStatus::BadMode);
    assert_eq!(DisplayChangeStatus::from(-6), DisplayChangeStatus::BadDualView);
    assert_eq!(DisplayChangeStatus::from(-42), DisplayChangeStatus::Unknown(-42));
    assert_eq!(DisplayChangeStatus::BadParam.code(), -5);
}

#[test]
fn test_full_mask_covers_every_field() {
    for field in [
        ModeFields::WIDTH,
        ModeFields::HEIGHT,
        ModeFields::BITS_PER_PIXEL,
        ModeFields::FREQUENCY,
        ModeFields::ORIENTATION,
        ModeFields::POSITION,
        ModeFields::FLAGS,
    ] {
        assert!(ModeFields::FULL.contains(field));
    }
}

#[test]
fn test_orientation_degrees() {
    assert_eq!(Orientation::try_from(180).unwrap(), Orientation::Rotate180);
    assert!(Orientation::try_from(100).is_err());
    assert_eq!(Orientation::Rotate270.to_raw(), 3);
    assert_eq!(Orientation::from_raw(1), Orientation::Rotate90);
    assert_eq!(Orientation::from_raw(7), Orientation::Default);
}

#[test]
fn test_video_mode_display() {
    let mut rotated = mode(1920, 1080, 32, 60);
    rotated.orientation = Orientation::Rotate90;

    assert_eq!(rotated.to_string(), "1920 by 1080, 90° orientation, 32 bpp, 60 Hz");
}

#[test]
fn test_video_mode_orientation_defaults_when_missing() {
    let parsed: VideoMode = serde_json::from_str(
        r#"{"width": 1280, "height": 720, "bits_per_pixel": 32, "frequency": 60}"#,
    )
    .expect("parse mode");
    assert_eq!(parsed.orientation, Orientation::Default);

    let rotated: VideoMode = serde_json::from_str(
        r#"{"width": 1280, "height": 720, "bits_per_pixel": 32, "frequency": 60, "orientation": 180}"#,
    )
    .expect("parse mode");
    assert_eq!(rotated.orientation, Orientation::Rotate180);

    let invalid = serde_json::from_str::<VideoMode>(
        r#"{"width": 1280, "height": 720, "bits_per_pixel": 32, "frequency": 60, "orientation": 45}"#,
    );
    assert!(invalid.is_err());
}
