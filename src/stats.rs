use crate::models::{Column, ColumnData, Dataset, FAMILY_COLUMN, SPECIES_COLUMN};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Row and label counts of a dataset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Description {
    pub unique_species: usize,
    pub data_points: usize,
    pub unique_families: usize,
}

/// Column to aggregate over when plotting means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    Species,
    Family,
}

impl GroupBy {
    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Species => SPECIES_COLUMN,
            GroupBy::Family => FAMILY_COLUMN,
        }
    }
}

/// Natural log of every numeric cell. Non-positive values have no logarithm and become missing.
pub fn log_transform(ds: &Dataset) -> Dataset {
    let columns = ds
        .columns()
        .iter()
        .map(|c| match &c.data {
            ColumnData::Numeric(v) => Column::numeric(
                c.name.clone(),
                v.iter()
                    .map(|cell| cell.filter(|x| *x > 0.0).map(f64::ln))
                    .collect(),
            ),
            ColumnData::Text(_) => c.clone(),
        })
        .collect();
    // Same shape as the input, so construction cannot fail.
    Dataset::new(columns).unwrap_or_else(|_| ds.clone())
}

/// Collapse rows sharing a species or family label.
///
/// Numeric columns become the mean of their present values, text columns keep
/// the first present value. Groups are ordered by first appearance; rows with
/// no label are left out.
pub fn group_means(ds: &Dataset, by: GroupBy) -> Result<Dataset> {
    let key_col = by.column();
    let keys = ds
        .text(key_col)
        .ok_or_else(|| anyhow!("dataset has no '{key_col}' text column to group by"))?;

    let mut order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(k) = key.as_deref() {
            members
                .entry(k)
                .or_insert_with(|| {
                    order.push(k);
                    Vec::new()
                })
                .push(row);
        }
    }

    let columns = ds
        .columns()
        .iter()
        .map(|c| {
            let data = match &c.data {
                ColumnData::Numeric(v) => ColumnData::Numeric(
                    order
                        .iter()
                        .map(|k| mean(members[k].iter().filter_map(|&r| v[r])))
                        .collect(),
                ),
                ColumnData::Text(v) => ColumnData::Text(
                    order
                        .iter()
                        .map(|k| members[k].iter().find_map(|&r| v[r].clone()))
                        .collect(),
                ),
            };
            Column {
                name: c.name.clone(),
                data,
            }
        })
        .collect();
    Dataset::new(columns)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Count unique species, data points (rows with a species), and unique families.
pub fn describe(ds: &Dataset) -> Description {
    let species = ds.text(SPECIES_COLUMN).unwrap_or(&[]);
    let families = ds.text(FAMILY_COLUMN).unwrap_or(&[]);
    let unique = |cells: &[Option<String>]| {
        cells
            .iter()
            .filter_map(|c| c.as_deref())
            .collect::<BTreeSet<_>>()
            .len()
    };
    Description {
        unique_species: unique(species),
        data_points: species.iter().filter(|c| c.is_some()).count(),
        unique_families: unique(families),
    }
}

/// Per-column statistics for every numeric column, in column order.
pub fn column_summaries(ds: &Dataset) -> Vec<Summary> {
    let mut out = Vec::new();
    for c in ds.columns() {
        let ColumnData::Numeric(cells) = &c.data else {
            continue;
        };
        let mut vals: Vec<f64> = cells.iter().flatten().copied().collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            column: c.name.clone(),
            count,
            missing: cells.len() - count,
            min: vals.first().copied(),
            max: vals.last().copied(),
            mean: mean(vals.iter().copied()),
            median,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::text(
                "Species",
                vec![Some("Homo_sapiens"), Some("Homo_sapiens"), Some("Ateles_geoffroyi")],
            ),
            Column::text("Family", vec![Some("Hominidae"), Some("Hominidae"), Some("Platyrrhini")]),
            Column::numeric("CerebrumVolume", vec![Some(1000.0), Some(1200.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn species_means_average_present_values() {
        let means = group_means(&sample(), GroupBy::Species).unwrap();
        assert_eq!(means.row_count(), 2);
        assert_eq!(means.numeric("CerebrumVolume").unwrap(), &[Some(1100.0), None]);
        assert_eq!(
            means.text("Family").unwrap(),
            &[Some("Hominidae".to_string()), Some("Platyrrhini".to_string())]
        );
    }

    #[test]
    fn log_drops_non_positive() {
        let ds = Dataset::new(vec![Column::numeric(
            "A",
            vec![Some(std::f64::consts::E), Some(0.0), Some(-2.0)],
        )])
        .unwrap();
        let logged = log_transform(&ds);
        let v = logged.numeric("A").unwrap();
        assert!((v[0].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(v[1], None);
        assert_eq!(v[2], None);
    }

    #[test]
    fn description_counts() {
        let d = describe(&sample());
        assert_eq!(
            d,
            Description {
                unique_species: 2,
                data_points: 3,
                unique_families: 2
            }
        );
    }
}
