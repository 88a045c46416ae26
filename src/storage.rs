use crate::models::{Column, ColumnData, Dataset};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("data file '{0}' was not found")]
    NotFound(PathBuf),
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("data file has no columns")]
    Empty,
}

/// Header clean-up applied while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Original header -> canonical name, matched after trimming whitespace.
    pub renames: BTreeMap<String, String>,
    /// Columns removed when present (e.g. literature `Source`).
    pub drop_columns: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            renames: BTreeMap::from([("Taxon".to_string(), "Family".to_string())]),
            drop_columns: vec!["Source".to_string()],
        }
    }
}

/// Load a measurement table from a CSV file.
pub fn load_dataset<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatasetError::NotFound(path.to_path_buf()),
        _ => DatasetError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let ds = read_dataset(file, opts)?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        ds.row_count(),
        ds.columns().len(),
        path.display()
    );
    Ok(ds)
}

/// Parse CSV text from any reader. Empty cells are missing values.
pub fn read_dataset<R: Read>(reader: R, opts: &LoadOptions) -> Result<Dataset, DatasetError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| {
            let h = h.trim();
            opts.renames.get(h).cloned().unwrap_or_else(|| h.to_string())
        })
        .collect();
    if headers.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (i, col) in cells.iter_mut().enumerate() {
            let cell = record.get(i).map(str::trim).filter(|s| !s.is_empty());
            col.push(cell.map(str::to_string));
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .filter(|(name, _)| !opts.drop_columns.iter().any(|d| d == name))
        .filter(|(name, values)| {
            let keep = values.iter().any(Option::is_some);
            if !keep {
                log::debug!("dropping empty column '{name}'");
            }
            keep
        })
        .map(|(name, values)| Column {
            name,
            data: classify(values),
        })
        .collect();

    if columns.is_empty() {
        return Err(DatasetError::Empty);
    }
    Dataset::new(columns).map_err(|_| DatasetError::Empty)
}

/// A column is numeric when every present cell parses as a number.
fn classify(values: Vec<Option<String>>) -> ColumnData {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    match parsed {
        Some(nums) => ColumnData::Numeric(nums),
        None => ColumnData::Text(values),
    }
}
