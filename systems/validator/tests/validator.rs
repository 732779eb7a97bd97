use ice_slide_core::{DataIntegrityWarning, MapData};
use ice_slide_system_validator::{fallback_map, validate_maps, validate_or_fallback};

fn square(id: &str, size: i32) -> MapData {
    let rows = (0..size).map(|_| vec![0; size as usize]).collect();
    MapData::from_rows(id, size, size, rows)
}

#[test]
fn valid_collection_is_left_untouched() {
    let original = vec![square("level1", 3), square("level2", 4)];
    let mut maps = original.clone();

    let report = validate_maps(&mut maps);

    assert!(report.is_clean());
    assert_eq!(maps, original);
}

#[test]
fn validating_twice_changes_nothing() {
    let mut maps = vec![square("level1", 3), square("level2", 2)];
    let mut tall = square("level3", 3);
    tall.height = 9;
    maps.push(tall);

    let _ = validate_maps(&mut maps);
    let once = maps.clone();
    let second = validate_maps(&mut maps);

    assert_eq!(maps, once, "second pass must not alter the collection");
    assert!(second.is_clean());
}

#[test]
fn height_mismatch_is_corrected_and_map_retained() {
    let mut map = square("tall", 5);
    map.height = 10;
    let mut maps = vec![map];

    let report = validate_maps(&mut maps);

    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].height, 5);
    assert_eq!(
        report.findings(),
        &[DataIntegrityWarning::HeightCorrected {
            id: "tall".to_owned(),
            from: 10,
            to: 5,
        }]
    );
}

#[test]
fn empty_id_and_zero_width_are_removed() {
    let unnamed = square("", 3);
    let mut flat = square("flat", 3);
    flat.width = 0;
    let mut maps = vec![square("keep-a", 3), unnamed, flat, square("keep-b", 2)];

    let report = validate_maps(&mut maps);

    let ids: Vec<&str> = maps.iter().map(|map| map.id.as_str()).collect();
    assert_eq!(ids, ["keep-a", "keep-b"], "survivors keep input order");
    assert_eq!(report.removed(), 2);
    assert_eq!(
        report.findings()[0],
        DataIntegrityWarning::MissingId { index: 1 }
    );
}

#[test]
fn maps_without_tiles_or_height_are_removed() {
    let no_tiles = MapData {
        id: "empty".to_owned(),
        width: 3,
        height: 3,
        tiles: Vec::new(),
    };
    let mut negative = square("negative", 2);
    negative.height = -1;
    let mut maps = vec![no_tiles, negative];

    let report = validate_maps(&mut maps);

    assert!(maps.is_empty());
    assert_eq!(report.removed(), 2);
}

#[test]
fn ragged_and_null_rows_are_reported_but_kept() {
    let map = MapData {
        id: "ragged".to_owned(),
        width: 3,
        height: 3,
        tiles: vec![Some(vec![1, 1, 1]), None, Some(vec![1, 1])],
    };
    let mut maps = vec![map.clone()];

    let report = validate_maps(&mut maps);

    assert_eq!(maps, vec![map], "row findings never alter the map");
    assert_eq!(
        report.findings(),
        &[
            DataIntegrityWarning::NullRow {
                id: "ragged".to_owned(),
                row: 1,
            },
            DataIntegrityWarning::WidthMismatch {
                id: "ragged".to_owned(),
                row: 2,
                expected: 3,
                actual: 2,
            },
        ]
    );
    assert_eq!(report.removed(), 0);
}

#[test]
fn emptied_collection_yields_only_the_fallback() {
    let mut broken = square("broken", 3);
    broken.width = -4;

    let (maps, report) = validate_or_fallback(vec![MapData::default(), broken]);

    assert_eq!(maps, vec![fallback_map()]);
    assert!(report.used_fallback());
    assert_eq!(maps[0].tiles[1].as_ref().map(|row| row[1]), Some(3));
    assert_eq!(maps[0].tiles[3].as_ref().map(|row| row[3]), Some(2));
}

#[test]
fn surviving_collection_skips_the_fallback() {
    let (maps, report) = validate_or_fallback(vec![square("only", 2)]);

    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0].id, "only");
    assert!(!report.used_fallback());
}
