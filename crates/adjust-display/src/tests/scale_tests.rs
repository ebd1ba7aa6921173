//! Tests for DPI scale range resolution and relative offsets

use crate::errors::DisplayError;
use crate::scale::{relative_offset, resolve_scale_info, ScaleInfo, SCALE_STEPS};
use crate::types::RawScaleRange;

fn raw(minimum: i32, current: i32, maximum: i32) -> RawScaleRange {
    RawScaleRange {
        minimum,
        current,
        maximum,
    }
}

#[test]
fn test_resolve_aligns_recommended_with_minimum_index() {
    let info = resolve_scale_info(raw(-2, 0, 5)).expect("range fits the table");

    assert_eq!(info.minimum, 100);
    assert_eq!(info.recommended, 150);
    assert_eq!(info.current, 150);
    assert_eq!(info.maximum, SCALE_STEPS[7]);
    assert_eq!(info.maximum, 300);
}

#[test]
fn test_resolve_current_above_recommended() {
    let info = resolve_scale_info(raw(0, 2, 3)).expect("range fits the table");

    assert_eq!(info.minimum, 100);
    assert_eq!(info.recommended, 100);
    assert_eq!(info.current, 150);
    assert_eq!(info.maximum, 175);
}

#[test]
fn test_resolve_whole_table() {
    let info = resolve_scale_info(raw(0, 0, 13)).expect("range fits the table");

    assert_eq!(info.maximum, 600);
}

#[test]
fn test_resolve_range_past_table_end() {
    assert_eq!(resolve_scale_info(raw(-2, 0, 12)), None);
    assert_eq!(resolve_scale_info(raw(0, 0, 14)), None);
}

#[test]
fn test_resolve_current_outside_range() {
    assert_eq!(resolve_scale_info(raw(-1, 3, 2)), None);
}

#[test]
fn test_relative_offset_from_recommended() {
    let info = ScaleInfo {
        minimum: 100,
        maximum: 300,
        current: 150,
        recommended: 150,
    };

    assert_eq!(relative_offset(&info, 300).unwrap(), 5);
    assert_eq!(relative_offset(&info, 150).unwrap(), 0);
    assert_eq!(relative_offset(&info, 100).unwrap(), -2);
}

#[test]
fn test_relative_offset_with_recommended_at_bottom() {
    let info = ScaleInfo {
        minimum: 100,
        maximum: 300,
        current: 100,
        recommended: 100,
    };

    assert_eq!(relative_offset(&info, 225).unwrap(), 5);
}

#[test]
fn test_scale_bounds_are_inclusive() {
    let info = ScaleInfo {
        minimum: 125,
        maximum: 200,
        current: 150,
        recommended: 150,
    };

    assert!(relative_offset(&info, 125).is_ok());
    assert!(relative_offset(&info, 200).is_ok());

    for requested in [124, 201] {
        match relative_offset(&info, requested) {
            Err(DisplayError::ScaleOutOfRange {
                requested: r,
                minimum,
                maximum,
            }) => {
                assert_eq!(r, requested);
                assert_eq!(minimum, 125);
                assert_eq!(maximum, 200);
            }
            other => panic!("expected ScaleOutOfRange, got {other:?}"),
        }
    }
}

#[test]
fn test_percent_between_steps_is_rejected() {
    let info = ScaleInfo {
        minimum: 100,
        maximum: 300,
        current: 150,
        recommended: 150,
    };

    let err = relative_offset(&info, 130).unwrap_err();

    assert!(matches!(err, DisplayError::ScaleOutOfRange { requested: 130, .. }));
}
