use std::path::PathBuf;

use splicemate_core::store::load_matrix;
use splicemate_core::{
    CompatibilityChecker, DriveAssignment, MaterialMatrix, MaterialType, SpliceDefaults,
    TransitionInfo, WarningPolicy,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn factory_matrix() -> MaterialMatrix {
    MaterialMatrix::factory_default(SpliceDefaults::builtin())
}

#[test]
fn test_compatible_print_passes_clean() {
    let matrix = factory_matrix();

    let mut drives = DriveAssignment::default();
    drives.assign(0, "Default PLA").expect("Failed to assign drive 0");
    drives.assign(1, "Default PETG").expect("Failed to assign drive 1");

    let mut transitions = TransitionInfo::default();
    transitions.add("0.20", 0, 1);
    transitions.add("0.40", 1, 0);
    transitions.add("0.60", 0, 1);

    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");

    assert!(
        report.is_clean(),
        "PLA and PETG are fully parameterized both ways: {report:?}"
    );
    assert!(!report.blocks_output());
}

#[test]
fn test_unspliceable_pair_reported_once_across_directions() {
    let matrix = factory_matrix();

    let mut drives = DriveAssignment::default();
    drives.assign(0, "Default PLA").expect("Failed to assign drive 0");
    drives.assign(1, "Default ABS").expect("Failed to assign drive 1");

    let mut transitions = TransitionInfo::default();
    transitions.add("1.00", 0, 1);
    transitions.add("1.20", 1, 0);
    transitions.add("1.40", 0, 1);

    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");

    assert_eq!(
        report.conflicts.len(),
        1,
        "Both directions collapse into one conflict: {:?}",
        report.conflicts
    );
    assert!(report.blocks_output(), "Conflicts must block output");

    let conflict = &report.conflicts[0];
    assert!(
        conflict.message.contains("Default PLA") && conflict.message.contains("Default ABS"),
        "Conflict message should name both profiles: {:?}",
        conflict.message
    );
}

#[test]
fn test_zero_factor_pair_warns_under_strict_policy() {
    let matrix = factory_matrix();

    let mut drives = DriveAssignment::default();
    drives.assign(0, "Default PLA").expect("Failed to assign drive 0");
    drives.assign(2, "Default PLA").expect("Failed to assign drive 2");

    let mut transitions = TransitionInfo::default();
    transitions.add("0.20", 0, 2);

    let strict = CompatibilityChecker::new(WarningPolicy::strict());
    let report = strict
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");
    assert_eq!(
        report.empty_algorithms.len(),
        1,
        "Zero factors fall back to the firmware algorithm: {report:?}"
    );
    assert!(!report.blocks_output(), "Warnings alone never block output");
    assert_eq!(report.empty_algorithms[0].outgoing, "Default PLA");

    // The recommended policy knows the firmware handles factory PLA itself.
    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");
    assert!(report.is_clean(), "got {report:?}");
}

#[test]
fn test_mixed_report_collects_conflicts_and_warnings() {
    let defaults = SpliceDefaults::builtin();
    let mut matrix = MaterialMatrix::factory_default(defaults);
    matrix
        .add_empty_profile("Budget PLA")
        .expect("Failed to add profile");
    matrix
        .change_profile_type("Budget PLA", MaterialType::PLA, defaults)
        .expect("Failed to type profile");

    let mut drives = DriveAssignment::default();
    drives.assign(0, "Default PLA").expect("Failed to assign drive 0");
    drives.assign(1, "Default ABS").expect("Failed to assign drive 1");
    drives.assign(2, "Budget PLA").expect("Failed to assign drive 2");
    drives.assign(3, "Default PETG").expect("Failed to assign drive 3");

    let mut transitions = TransitionInfo::default();
    transitions.add("0.20", 0, 1);
    transitions.add("0.20", 1, 0);
    transitions.add("0.40", 2, 0);
    transitions.add("0.60", 0, 3);
    transitions.add("0.80", 3, 1);

    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");

    assert_eq!(
        report.conflicts.len(),
        2,
        "PLA/ABS and PETG/ABS both conflict: {:?}",
        report.conflicts
    );
    assert_eq!(
        report.empty_algorithms.len(),
        1,
        "The seeded Budget PLA into Default PLA pair has zero factors: {:?}",
        report.empty_algorithms
    );
    assert!(report.blocks_output());
}

#[test]
fn test_transitions_on_unassigned_drives_are_skipped() {
    let matrix = factory_matrix();

    let mut drives = DriveAssignment::default();
    drives.assign(0, "Default PLA").expect("Failed to assign drive 0");
    // Drive 3 left empty: its transitions cannot be judged yet.

    let mut transitions = TransitionInfo::default();
    transitions.add("0.20", 0, 3);

    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");
    assert!(
        report.is_clean(),
        "Transitions touching unassigned drives contribute nothing: {report:?}"
    );
}

#[test]
fn test_fixture_matrix_drives_a_full_check() {
    let matrix =
        load_matrix(&fixture_path("workshop_matrix.yaml")).expect("Failed to load fixture");

    let mut drives = DriveAssignment::default();
    // Slicer output does not always match the matrix casing.
    drives
        .assign(0, "galaxy black pla")
        .expect("Failed to assign drive 0");
    drives
        .assign(1, "Cheetah TPU 95A")
        .expect("Failed to assign drive 1");

    let mut transitions = TransitionInfo::default();
    transitions.add("0.20", 0, 1);

    let report = CompatibilityChecker::default()
        .validate(&transitions, &drives, &matrix)
        .expect("Validation should succeed");

    assert_eq!(
        report.conflicts.len(),
        1,
        "The fixture never configured this pair: {report:?}"
    );
    assert!(
        report.conflicts[0].message.contains("Galaxy Black PLA"),
        "Reports use the canonical profile name: {:?}",
        report.conflicts[0].message
    );
}
