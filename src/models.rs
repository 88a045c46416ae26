use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Whether a column holds measurements or labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Cell storage for one column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }
}

/// One entry of a dataset schema: column position is implied by order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// Table of observations, one row per specimen/species, columns in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

/// Column holding the taxonomic family of each row.
pub const FAMILY_COLUMN: &str = "Family";
/// Column holding the species identifier of each row (e.g. `Homo_sapiens`).
pub const SPECIES_COLUMN: &str = "Species";

impl Dataset {
    /// Build a dataset from columns of equal length.
    pub fn new(columns: Vec<Column>) -> anyhow::Result<Self> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != rows) {
            anyhow::bail!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.data.len(),
                rows
            );
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn schema(&self) -> Vec<SchemaColumn> {
        self.columns
            .iter()
            .map(|c| SchemaColumn {
                name: c.name.clone(),
                kind: c.kind(),
            })
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        match &self.column(name)?.data {
            ColumnData::Text(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Family label per row, `None` where the column or cell is missing.
    pub fn families(&self) -> Vec<Option<&str>> {
        match self.text(FAMILY_COLUMN) {
            Some(v) => v.iter().map(|c| c.as_deref()).collect(),
            None => vec![None; self.rows],
        }
    }

    /// Name of the first text column containing `value` (e.g. "Species" for `Homo_sapiens`).
    pub fn rank_of(&self, value: &str) -> Option<&str> {
        self.columns.iter().find_map(|c| match &c.data {
            ColumnData::Text(v) if v.iter().any(|cell| cell.as_deref() == Some(value)) => {
                Some(c.name.as_str())
            }
            _ => None,
        })
    }
}

/// Human-readable label for a column name: `CerebellumSurfaceArea` -> `Cerebellum Surface Area`.
pub fn display_name(column: &str) -> String {
    static CAMEL: OnceLock<Regex> = OnceLock::new();
    let re = CAMEL.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("static regex"));
    re.replace_all(column.trim(), "$1 $2").replace('_', " ")
}

/// Unordered pair of measurement columns plotted as x against y.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariablePair {
    pub x: String,
    pub y: String,
}

impl VariablePair {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl fmt::Display for VariablePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Plain measurements or natural-log transformed measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotKind {
    Simple,
    Logged,
}

impl PlotKind {
    pub fn is_logged(self) -> bool {
        matches!(self, PlotKind::Logged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_names_are_split() {
        assert_eq!(display_name("CerebellumVolume"), "Cerebellum Volume");
        assert_eq!(
            display_name("CerebellumSurfaceArea "),
            "Cerebellum Surface Area"
        );
        assert_eq!(display_name("Homo_sapiens"), "Homo sapiens");
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Dataset::new(vec![
            Column::numeric("A", vec![Some(1.0), Some(2.0)]),
            Column::numeric("B", vec![Some(1.0)]),
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn rank_lookup_finds_text_column() {
        let ds = Dataset::new(vec![
            Column::text("Species", vec![Some("Homo_sapiens"), Some("Pan_paniscus")]),
            Column::text("Family", vec![Some("Hominidae"), Some("Hominidae")]),
        ])
        .unwrap();
        assert_eq!(ds.rank_of("Homo_sapiens"), Some("Species"));
        assert_eq!(ds.rank_of("Hominidae"), Some("Family"));
        assert_eq!(ds.rank_of("Nope"), None);
    }
}
