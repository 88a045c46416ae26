use cbp_rs::Config;
use cbp_rs::models::ColumnKind;
use cbp_rs::stats::{self, GroupBy};
use cbp_rs::storage::{DatasetError, load_dataset};
use std::fs;

const CSV: &str = "\
Species ,Taxon,CerebellumVolume,CerebrumVolume,Source
Homo_sapiens,Hominidae,137.0,1170.0,Smith 1999
Homo_sapiens,Hominidae,141.0,1190.0,Doe 2001
Pan_troglodytes,Hominidae,50.0,,Doe 2001
Hylobates_lar,Hylobatidae,11.2,84.0,Roe 1990
";

#[test]
fn load_from_file_with_config_options() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("values.csv");
    fs::write(&path, CSV).unwrap();

    let cfg = Config::default();
    let ds = load_dataset(&path, &cfg.load_options()).unwrap();
    let schema = ds.schema();
    let names: Vec<&str> = schema.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["Species", "Family", "CerebellumVolume", "CerebrumVolume"]
    );
    assert_eq!(schema[1].kind, ColumnKind::Text);
    assert_eq!(schema[3].kind, ColumnKind::Numeric);
    assert_eq!(ds.row_count(), 4);
}

#[test]
fn missing_file_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let err = load_dataset(tmp.path().join("nope.csv"), &Default::default()).unwrap_err();
    assert!(matches!(err, DatasetError::NotFound(_)));
}

#[test]
fn counts_and_summaries() {
    let ds = cbp_rs::storage::read_dataset(CSV.as_bytes(), &Default::default()).unwrap();
    let d = stats::describe(&ds);
    assert_eq!(
        (d.unique_species, d.data_points, d.unique_families),
        (3, 4, 2)
    );

    let summaries = stats::column_summaries(&ds);
    let cerebrum = summaries
        .iter()
        .find(|s| s.column == "CerebrumVolume")
        .unwrap();
    assert_eq!((cerebrum.count, cerebrum.missing), (3, 1));
    assert_eq!(cerebrum.min, Some(84.0));
    assert_eq!(cerebrum.median, Some(1170.0));
}

#[test]
fn family_means_keep_first_appearance_order() {
    let ds = cbp_rs::storage::read_dataset(CSV.as_bytes(), &Default::default()).unwrap();
    let means = stats::group_means(&ds, GroupBy::Family).unwrap();
    assert_eq!(means.row_count(), 2);
    assert_eq!(means.families(), vec![Some("Hominidae"), Some("Hylobatidae")]);
    let cerebellum = means.numeric("CerebellumVolume").unwrap();
    assert!((cerebellum[0].unwrap() - 109.333_333).abs() < 1e-3);
    assert_eq!(cerebellum[1], Some(11.2));
}
