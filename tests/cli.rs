use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

// Defaults (4, 3, 1) all land on numeric columns here.
const CSV: &str = "\
Species,BodyMass,CerebellumVolume,CerebrumVolume,CerebellumSurfaceArea,Taxon,Source
Homo_sapiens,65000,137.0,1170.0,1590.0,Hominidae,A
Pan_troglodytes,45000,50.2,330.0,820.0,Hominidae,B
Hylobates_lar,5500,11.2,84.0,390.0,Hylobatidae,C
Macaca_mulatta,7700,8.1,63.4,300.0,Cercopithecidae,D
";

fn write_data(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("values.csv");
    fs::write(&path, CSV).unwrap();
    path
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cbp"));
}

#[test]
fn describe_prints_counts() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["describe", "--summary"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Unique species: 4"))
        .stdout(predicate::str::contains("Unique families: 3"))
        .stdout(predicate::str::contains("CerebrumVolume  count=4 missing=0"));
}

#[test]
fn missing_data_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .args(["--data", "absent.csv", "describe"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn delete_without_folder_explains() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path()).args(["delete", "--logged"]);
    cmd.assert().success().stdout(predicate::str::contains(
        "No 'Saved Log Plots' folder exists in the current directory",
    ));
}

#[test]
fn save_default_plot_into_first_slot() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["plot", "--save", "--yes"]);
    cmd.assert().success();

    let dir = tmp.path().join("Saved Simple Plots");
    assert!(dir.join("Default Simple Plots - #1.png").exists());
    let details = fs::read_to_string(dir.join("SIMPLE_PLOT_DETAILS.txt")).unwrap();
    assert!(details.contains("(CerebellumSurfaceArea, CerebrumVolume)"));
}

#[test]
fn declined_save_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    // assert_cmd's Command can feed stdin.
    let mut cmd = assert_cmd::Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["plot", "--logged", "--xy", "2", "3", "--save"])
        .write_stdin("maybe\nn\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Please answer Y or N."))
        .stdout(predicate::str::contains("Plot not saved."));
    assert!(!tmp.path().join("Saved Log Plots").exists());
}

#[test]
fn non_integer_index_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["plot", "--xy", "2", "3.5", "--out", "x.png"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("'3.5' is not a column index"));
    assert!(!tmp.path().join("x.png").exists());
}

#[test]
fn defaults_can_be_set_and_shown() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let config = tmp.path().join("cfg.json");
    fs::write(&config, "{}").unwrap();
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("--data")
        .arg(&data)
        .args(["defaults", "--set", "2", "3"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "[2, 3], equivalent to [(CerebellumVolume, CerebrumVolume)]",
        ));
    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("\"default_indices\""));

    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["defaults", "--set", "-1", "2"]);
    cmd.assert().failure();
}

#[test]
fn huge_grid_is_an_error_not_a_crash() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["plot", "--grid", "18446744073709551615,2", "--out", "x.png"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the limit"))
        .stderr(predicate::str::contains("panicked").not());

    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["plot", "--figsize", "inf,4", "--out", "x.png"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("positive, finite"));
    assert!(!tmp.path().join("x.png").exists());
}

#[test]
fn describe_writes_volume_box_plots() {
    let tmp = tempfile::tempdir().unwrap();
    let data = write_data(tmp.path());
    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["describe", "--volume-boxplot", "--out", "v.png"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Unique species: 4"));
    assert!(fs::metadata(tmp.path().join("v.png")).unwrap().len() > 0);

    let mut cmd = Command::cargo_bin("cbp").unwrap();
    cmd.current_dir(tmp.path())
        .arg("--data")
        .arg(&data)
        .args(["describe", "--surface-area-boxplot"]);
    cmd.assert().failure();
}
