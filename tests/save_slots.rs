use cbp_rs::models::{PlotKind, VariablePair};
use cbp_rs::save::{DeleteOutcome, SaveLabel, allocate_and_record, delete_save_dir, next_free_slot};
use std::fs;
use std::path::Path;

fn pairs(n: usize) -> Vec<VariablePair> {
    [
        ("CerebellumSurfaceArea", "CerebrumVolume"),
        ("CerebellumSurfaceArea", "BodyMass"),
        ("CerebrumVolume", "BodyMass"),
    ]
    .into_iter()
    .take(n)
    .map(|(x, y)| VariablePair::new(x, y))
    .collect()
}

fn touch(path: &Path) -> anyhow::Result<()> {
    fs::write(path, b"png")?;
    Ok(())
}

#[test]
fn first_save_in_empty_dir_is_slot_one() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join(PlotKind::Simple.dir_name());

    let saved =
        allocate_and_record(PlotKind::Simple, &pairs(3), true, &dir, None, |p| touch(p)).unwrap();
    assert_eq!(saved.ordinal, 1);
    assert_eq!(
        saved.path.file_name().unwrap().to_str().unwrap(),
        "Default Simple Plots - #1.png"
    );
    assert!(saved.path.exists());

    let details = fs::read_to_string(dir.join("SIMPLE_PLOT_DETAILS.txt")).unwrap();
    assert!(details.starts_with("Default Simple Plots - #1 - \n"));
    assert!(details.contains("(CerebellumSurfaceArea, CerebrumVolume)\n"));
    assert!(details.contains("- Figure Created on "));
    assert!(details.ends_with("------------------------------------------------------\n"));
}

#[test]
fn slots_fill_gaps_left_by_deleted_files() {
    let tmp = tempfile::tempdir().unwrap();
    let label = SaveLabel::new(PlotKind::Simple, 2, false);
    for n in 1..=3 {
        fs::write(tmp.path().join(label.file_name(n)), b"").unwrap();
    }
    assert_eq!(next_free_slot(tmp.path(), &label), 4);

    fs::remove_file(tmp.path().join("2 Simple Plots - #2.png")).unwrap();
    assert_eq!(next_free_slot(tmp.path(), &label), 2);

    // Other labels have their own numbering.
    let other = SaveLabel::new(PlotKind::Simple, 1, false);
    assert_eq!(next_free_slot(tmp.path(), &other), 1);
}

#[test]
fn records_accumulate_and_name_the_emphasis() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join(PlotKind::Logged.dir_name());

    let first = allocate_and_record(PlotKind::Logged, &pairs(1), false, &dir, None, |p| touch(p))
        .unwrap();
    let second = allocate_and_record(
        PlotKind::Logged,
        &pairs(1),
        false,
        &dir,
        Some("Homo_sapiens"),
        |p| touch(p),
    )
    .unwrap();
    assert_eq!((first.ordinal, second.ordinal), (1, 2));
    assert!(second.path.ends_with("1 Log Plot - #2.png"));

    let details = fs::read_to_string(dir.join("LOG_PLOT_DETAILS.txt")).unwrap();
    assert_eq!(details.matches("1 Log Plot - #").count(), 2);
    assert!(details.contains("1 Log Plot - #2 - Homo sapiens emphasized -\n"));
}

#[test]
fn failed_render_records_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join(PlotKind::Simple.dir_name());

    let err = allocate_and_record(PlotKind::Simple, &pairs(2), false, &dir, None, |_| {
        anyhow::bail!("render failed")
    })
    .unwrap_err();
    assert!(err.to_string().contains("render failed"));
    assert!(!dir.join(PlotKind::Simple.details_file()).exists());
}

#[test]
fn delete_reports_missing_and_removes_existing() {
    let tmp = tempfile::tempdir().unwrap();
    match delete_save_dir(tmp.path(), PlotKind::Logged).unwrap() {
        DeleteOutcome::Missing(msg) => assert_eq!(
            msg,
            "No 'Saved Log Plots' folder exists in the current directory, and so could not be deleted."
        ),
        other => panic!("unexpected {other:?}"),
    }

    let dir = tmp.path().join("Saved Simple Plots");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("x.png"), b"").unwrap();
    assert_eq!(
        delete_save_dir(tmp.path(), PlotKind::Simple).unwrap(),
        DeleteOutcome::Deleted(dir.clone())
    );
    assert!(!dir.exists());
}
