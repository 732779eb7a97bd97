use ice_slide_system_levels::{ProgressRecord, ProgressTracker};

#[test]
fn first_level_starts_unlocked() {
    let tracker = ProgressTracker::new("level1", false);

    assert!(tracker.is_unlocked("level1"));
    assert!(!tracker.is_unlocked("level2"));
    assert_eq!(tracker.unlocked_count(), 1);
    assert_eq!(tracker.completed_count(), 0);
}

#[test]
fn completing_a_level_unlocks_its_successor() {
    let mut tracker = ProgressTracker::new("level1", false);

    assert!(tracker.complete("level1"));
    assert!(!tracker.complete("level1"), "second completion is a no-op");

    assert!(tracker.is_completed("level1"));
    assert!(tracker.is_unlocked("level2"));
    assert!(!tracker.is_unlocked("level3"));
}

#[test]
fn completing_unnumbered_level_unlocks_only_itself() {
    let mut tracker = ProgressTracker::new("level1", false);

    assert!(tracker.complete("secret"));

    assert_eq!(tracker.unlocked_levels(), ["level1", "secret"]);
}

#[test]
fn unlock_all_override_reports_nothing_completed() {
    let mut tracker = ProgressTracker::new("level1", true);
    let _ = tracker.complete("level1");

    assert!(tracker.is_unlocked("level99"));
    assert!(!tracker.is_completed("level1"));
}

#[test]
fn unlock_all_ids_trims_entries() {
    let mut tracker = ProgressTracker::new("level1", false);
    tracker.unlock_all(["level2 ", " level3", ""]);

    assert_eq!(tracker.unlocked_levels(), ["level1", "level2", "level3"]);
}

#[test]
fn reset_keeps_only_first_level() {
    let mut tracker = ProgressTracker::new("level1", false);
    let _ = tracker.complete("level1");
    let _ = tracker.complete("level2");

    tracker.reset();

    assert_eq!(tracker.completed_count(), 0);
    assert_eq!(tracker.unlocked_levels(), ["level1"]);
}

#[test]
fn record_survives_json_persistence() {
    let mut tracker = ProgressTracker::new("level1", false);
    let _ = tracker.complete("level1");

    let json = serde_json::to_string(&tracker.record()).expect("serialize progress");
    let record: ProgressRecord = serde_json::from_str(&json).expect("deserialize progress");
    let restored = ProgressTracker::from_record(record, "level1", false);

    assert_eq!(restored, tracker);
}

#[test]
fn partial_record_defaults_missing_fields() {
    let record: ProgressRecord =
        serde_json::from_str(r#"{ "completed": ["level1"] }"#).expect("deserialize progress");
    let tracker = ProgressTracker::from_record(record, "level1", false);

    assert!(tracker.is_completed("level1"));
    assert_eq!(tracker.unlocked_levels(), ["level1"]);
}
