//! Tests for mode catalog deduplication and current-mode resolution

use super::{mode, two_display_platform};
use crate::catalog::ModeCatalog;
use crate::types::Orientation;

#[test]
fn test_dedup_ignores_orientation() {
    let mut rotated = mode(1920, 1080, 32, 60);
    rotated.orientation = Orientation::Rotate90;
    let raw = vec![
        mode(1920, 1080, 32, 60),
        rotated,
        mode(1920, 1080, 32, 144),
        mode(1920, 1080, 32, 60),
        mode(1920, 1080, 16, 60),
    ];

    let catalog = ModeCatalog::from_modes(raw);

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.modes()[0], mode(1920, 1080, 32, 60));
    assert_eq!(catalog.modes()[1], mode(1920, 1080, 32, 144));
    assert_eq!(catalog.modes()[2], mode(1920, 1080, 16, 60));
}

#[test]
fn test_dedup_keeps_first_seen_record() {
    let mut rotated = mode(1024, 768, 32, 60);
    rotated.orientation = Orientation::Rotate180;
    let catalog = ModeCatalog::from_modes(vec![rotated, mode(1024, 768, 32, 60)]);

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.modes()[0].orientation, Orientation::Rotate180);
}

#[test]
fn test_current_index_points_at_matching_mode() {
    let catalog = ModeCatalog::from_modes(vec![
        mode(800, 600, 32, 60),
        mode(1024, 768, 32, 60),
        mode(1280, 720, 32, 60),
    ])
    .with_current(&mode(1024, 768, 32, 60));

    assert_eq!(catalog.current_index(), 1);
    assert_eq!(catalog.current_mode(), Some(&mode(1024, 768, 32, 60)));
}

#[test]
fn test_unknown_current_mode_falls_back_to_first() {
    let catalog = ModeCatalog::from_modes(vec![mode(800, 600, 32, 60), mode(1024, 768, 32, 60)])
        .with_current(&mode(3840, 2160, 32, 60));

    assert_eq!(catalog.current_index(), 0);
    assert_eq!(catalog.current_mode(), Some(&mode(800, 600, 32, 60)));
}

#[test]
fn test_empty_catalog_has_no_current_mode() {
    let catalog = ModeCatalog::from_modes(Vec::new()).with_current(&mode(800, 600, 32, 60));

    assert!(catalog.is_empty());
    assert_eq!(catalog.current_mode(), None);
}

#[test]
fn test_by_number_is_one_based() {
    let catalog = ModeCatalog::from_modes(vec![mode(800, 600, 32, 60), mode(1024, 768, 32, 60)]);

    assert_eq!(catalog.by_number(0), None);
    assert_eq!(catalog.by_number(1), Some(&mode(800, 600, 32, 60)));
    assert_eq!(catalog.by_number(2), Some(&mode(1024, 768, 32, 60)));
    assert_eq!(catalog.by_number(3), None);
}

#[test]
fn test_enumerate_reads_platform_current_mode() {
    let platform = two_display_platform();
    let catalog = ModeCatalog::enumerate(&platform, r"\\.\DISPLAY1").expect("enumerate modes");

    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.current_index(), 3);
}

#[test]
fn test_enumerate_unknown_device_fails() {
    let platform = two_display_platform();
    let result = ModeCatalog::enumerate(&platform, r"\\.\DISPLAY9");

    assert!(result.is_err());
}
