use std::path::PathBuf;

use splicemate_core::store::load_matrix;
use splicemate_core::{ActiveMatrix, MaterialType, SpliceDefaults, SpliceSettings};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

#[test]
fn test_open_seeds_factory_matrix_on_first_run() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("SpliceMate").join("materials.yaml");

    let active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    assert!(path.exists(), "First open must write the seeded document");
    assert_eq!(
        active.matrix().len(),
        5,
        "The factory catalogue holds five profiles"
    );
    assert!(active.matrix().is_factory("Default PLA"));

    let on_disk = load_matrix(&path).expect("Failed to read back written document");
    assert_eq!(*active.matrix(), on_disk);
}

#[test]
fn test_open_restores_factory_profiles_in_hand_edited_documents() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    std::fs::copy(fixture_path("stripped_matrix.yaml"), &path).expect("Failed to stage fixture");

    let active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");
    let matrix = active.matrix();

    assert_eq!(
        matrix.len(),
        6,
        "Two survivors plus four restored factory profiles"
    );
    for name in ["Default ABS", "Default PETG", "Default TPU", "Default Nylon"] {
        assert!(matrix.profile(name).is_some(), "{name} should be restored");
    }

    // The drifted type is put back; the dialed-in self pair is kept.
    assert_eq!(
        matrix.profile("Default PLA").expect("present").material_type,
        Some(MaterialType::PLA)
    );
    let own = matrix
        .pair("Default PLA", "Default PLA")
        .expect("Profile exists")
        .expect("Pair should stay configured");
    assert_eq!((own.heat_factor, own.compression_factor), (1, 1));

    // Repairs reach the document right away.
    let on_disk = load_matrix(&path).expect("Failed to read back repaired document");
    assert_eq!(*matrix, on_disk);
}

#[test]
fn test_commit_persists_an_edit_session() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let mut active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    let mut session = active.begin_edit();
    assert!(!session.is_dirty(), "A fresh session starts clean");

    session
        .matrix_mut()
        .add_empty_profile("Afternoon Teal")
        .expect("Failed to add profile");
    assert!(session.is_dirty());

    active.commit(session).expect("Failed to commit session");
    assert!(active.matrix().profile("Afternoon Teal").is_some());

    let on_disk = load_matrix(&path).expect("Failed to read back");
    assert!(
        on_disk.profile("Afternoon Teal").is_some(),
        "Committed edits must reach the document on disk"
    );
}

#[test]
fn test_dropping_a_session_discards_its_changes() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    {
        let mut session = active.begin_edit();
        session
            .matrix_mut()
            .add_empty_profile("Never Saved")
            .expect("Failed to add profile");
        assert!(session.is_dirty());
    }

    assert!(
        active.matrix().profile("Never Saved").is_none(),
        "Uncommitted edits must not leak into the committed state"
    );
    let on_disk = load_matrix(&path).expect("Failed to read back");
    assert!(on_disk.profile("Never Saved").is_none());
}

#[test]
fn test_update_applies_and_persists_a_single_change() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let mut active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    active
        .update(|matrix| matrix.add_empty_profile("Quick Change"))
        .expect("Failed to apply update");

    assert!(active.matrix().profile("Quick Change").is_some());
    let on_disk = load_matrix(&path).expect("Failed to read back");
    assert!(on_disk.profile("Quick Change").is_some());
}

#[test]
fn test_failed_update_leaves_state_untouched() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let mut active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    let err = active
        .update(|matrix| matrix.delete_profile("Default PLA"))
        .expect_err("Factory deletion must fail");
    assert!(
        err.to_string().contains("factory profile"),
        "got {err}"
    );

    assert!(
        active.matrix().profile("Default PLA").is_some(),
        "The committed state keeps the factory profile"
    );
    let on_disk = load_matrix(&path).expect("Failed to read back");
    assert_eq!(*active.matrix(), on_disk, "Disk and memory must agree after a failed update");
}

#[test]
fn test_commit_rejects_out_of_range_factors() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let mut active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    let mut session = active.begin_edit();
    session
        .matrix_mut()
        .set_pair(
            "Default PLA",
            "Default PETG",
            Some(SpliceSettings::new(99, 1, false)),
        )
        .expect("Failed to set pair");

    let err = active
        .commit(session)
        .expect_err("Out-of-range factors must never reach disk");
    assert!(err.to_string().contains("heatFactor"), "got {err}");

    // The committed state still holds the seeded value.
    let pair = active
        .matrix()
        .pair("Default PLA", "Default PETG")
        .expect("Profiles exist")
        .expect("Pair should stay configured");
    assert_eq!((pair.heat_factor, pair.compression_factor), (3, 4));
}

#[test]
fn test_failed_commit_returns_the_session_with_edits_intact() {
    init_tracing();
    let defaults = SpliceDefaults::builtin();
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("materials.yaml");
    let mut active = ActiveMatrix::open(&path, defaults).expect("Failed to open matrix");

    let mut session = active.begin_edit();
    for name in ["Coral Silk PLA", "Slate PETG", "Ember ABS"] {
        session
            .matrix_mut()
            .add_empty_profile(name)
            .expect("Failed to add profile");
    }
    session
        .matrix_mut()
        .set_pair(
            "Default PLA",
            "Default ABS",
            Some(SpliceSettings::new(99, 1, false)),
        )
        .expect("Failed to set pair");

    let err = active
        .commit(session)
        .expect_err("Out-of-range factors must block the commit");

    // One bad pair must not cost the three good edits.
    let mut session = err.session;
    for name in ["Coral Silk PLA", "Slate PETG", "Ember ABS"] {
        assert!(
            session.matrix().profile(name).is_some(),
            "{name} should survive the rejected commit"
        );
    }

    session
        .matrix_mut()
        .set_pair("Default PLA", "Default ABS", None)
        .expect("Failed to clear pair");
    active
        .commit(session)
        .expect("The repaired session should commit");

    let on_disk = load_matrix(&path).expect("Failed to read back");
    for name in ["Coral Silk PLA", "Slate PETG", "Ember ABS"] {
        assert!(on_disk.profile(name).is_some(), "{name} should be persisted");
    }
}
