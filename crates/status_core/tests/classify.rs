use status_core::{
    inconsistent, unsupported, up_to_date, updatable_all, updatable_eligible, FilterPreset,
    RecipeStatus, Snapshot, SnapshotCounts,
};

fn recipe(name: &str, configure: impl FnOnce(&mut RecipeStatus)) -> RecipeStatus {
    let mut record = RecipeStatus::named(name);
    configure(&mut record);
    record
}

fn fixture() -> Snapshot {
    Snapshot::from_records(vec![
        recipe("zlib", |r| r.up_to_date = true),
        recipe("boost", |r| r.updatable = true),
        recipe("old", |r| {
            r.updatable = true;
            r.deprecated = true;
        }),
        recipe("broken", |r| {
            r.supported = false;
            r.updatable = true;
            r.inconsistent_versioning = true;
        }),
        recipe("weird", |r| r.inconsistent_versioning = true),
        recipe("fmt", |r| r.updatable = true),
        recipe("legacy", |r| {
            r.supported = false;
            r.updatable = true;
            r.deprecated = true;
        }),
    ])
}

fn names(records: Vec<&RecipeStatus>) -> Vec<&str> {
    records.into_iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn presets_preserve_snapshot_order() {
    let snapshot = fixture();

    assert_eq!(
        names(updatable_all(&snapshot)),
        vec!["boost", "old", "fmt", "legacy"]
    );
    assert_eq!(names(updatable_eligible(&snapshot)), vec!["boost", "fmt"]);
    assert_eq!(names(unsupported(&snapshot)), vec!["broken", "legacy"]);
    assert_eq!(names(inconsistent(&snapshot)), vec!["weird"]);
    assert_eq!(names(up_to_date(&snapshot)), vec!["zlib"]);
}

#[test]
fn unsupported_records_never_drive_other_presets() {
    let snapshot = fixture();

    for preset in FilterPreset::ALL {
        let matched = preset.apply(&snapshot);
        match preset {
            FilterPreset::Unsupported => assert!(matched.iter().all(|r| !r.supported)),
            FilterPreset::UpdatableAll => {
                assert!(matched.iter().all(|r| r.supported || r.deprecated))
            }
            _ => assert!(matched.iter().all(|r| r.supported), "{preset} leaked"),
        }
    }
}

#[test]
fn deprecated_updatable_recipes_published_as_unsupported_stay_updatable() {
    let json = br#"{
        "date": "2021-03-01T10:00:00",
        "recipes": [
            {"name": "fmt", "supported": true, "updatable": true, "deprecated": false},
            {"name": "old", "supported": false, "updatable": true, "deprecated": true}
        ]
    }"#;
    let snapshot = Snapshot::from_json_slice(json).unwrap();

    assert_eq!(names(updatable_all(&snapshot)), vec!["fmt", "old"]);
    assert_eq!(names(updatable_eligible(&snapshot)), vec!["fmt"]);
    assert_eq!(SnapshotCounts::from_snapshot(&snapshot).updatable, 2);
}

#[test]
fn eligible_differs_from_all_by_exactly_the_deprecated_records() {
    let snapshot = fixture();
    let all = names(updatable_all(&snapshot));
    let eligible = names(updatable_eligible(&snapshot));

    assert!(eligible.iter().all(|name| all.contains(name)));
    let difference: Vec<&str> = all
        .iter()
        .copied()
        .filter(|name| !eligible.contains(name))
        .collect();
    let deprecated: Vec<&str> = updatable_all(&snapshot)
        .into_iter()
        .filter(|r| r.deprecated)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(difference, deprecated);
}

#[test]
fn presets_are_idempotent() {
    let snapshot = fixture();

    for preset in FilterPreset::ALL {
        assert_eq!(preset.apply(&snapshot), preset.apply(&snapshot));
    }
}

#[test]
fn counts_summarize_presets() {
    let counts = SnapshotCounts::from_snapshot(&fixture());

    assert_eq!(
        counts,
        SnapshotCounts {
            total: 7,
            up_to_date: 1,
            updatable: 4,
            inconsistent: 1,
            unsupported: 2,
            deprecated: 2,
        }
    );
}
