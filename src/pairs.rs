//! Turning requested column positions into the variable pairs to plot.
//!
//! Callers ask for measurements by column position (`4 3 1`), by explicit
//! name pairs (`CerebrumVolume:CerebellumVolume`), or not at all. Positions
//! are checked against the dataset schema: only in-range numeric columns
//! qualify, duplicates are collapsed in first-seen order, and every unordered
//! combination of the survivors is produced. Fewer than two survivors fall
//! back to the default positions.

use crate::models::{ColumnKind, SchemaColumn, VariablePair};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error(
        "'{0}' is not a column index or an X:Y pair; pairs are made from integers or string pairs, not floating-point or alpha values"
    )]
    NonInteger(String),
    #[error("the default indices {defaults:?} do not name two numeric columns")]
    DefaultsUnusable { defaults: Vec<usize> },
}

/// What the caller asked to plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PairRequest {
    /// Nothing requested: combine the default indices.
    #[default]
    Default,
    /// Column positions to validate and combine.
    Indices(Vec<i64>),
    /// Already-formed pairs, plotted as given.
    Named(Vec<VariablePair>),
}

impl PairRequest {
    /// Parse command-line tokens. Integers are positions, `X:Y` is a named pair.
    /// Mixing the two forms is rejected.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ResolveError> {
        if tokens.is_empty() {
            return Ok(PairRequest::Default);
        }
        let named: Option<Vec<VariablePair>> = tokens
            .iter()
            .map(|t| {
                let (x, y) = t.as_ref().split_once(':')?;
                let (x, y) = (x.trim(), y.trim());
                (!x.is_empty() && !y.is_empty()).then(|| VariablePair::new(x, y))
            })
            .collect();
        if let Some(pairs) = named {
            return Ok(PairRequest::Named(pairs));
        }
        tokens
            .iter()
            .map(|t| {
                let t = t.as_ref().trim();
                t.parse::<i64>()
                    .map_err(|_| ResolveError::NonInteger(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PairRequest::Indices)
    }
}

/// Non-fatal notes produced while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Some positions were out of range or named non-numeric columns.
    InvalidIndices { invalid: Vec<i64>, valid: Vec<usize> },
    /// Repeated valid positions were collapsed.
    DuplicatesIgnored(Vec<usize>),
    /// Fewer than two usable positions; the defaults were plotted instead.
    Insufficient {
        only_valid: Option<usize>,
        defaults: Vec<usize>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidIndices { invalid, valid } => write!(
                f,
                "The following invalid indices were requested: {invalid:?}. \
                 Combinations were therefore made from the following indices only: {valid:?}."
            ),
            Diagnostic::DuplicatesIgnored(dupes) => write!(
                f,
                "Duplicates of the following valid column indices were ignored to avoid \
                 plotting them against one another: {dupes:?}."
            ),
            Diagnostic::Insufficient {
                only_valid,
                defaults,
            } => {
                write!(f, "No valid combinations could be made from the requested indices.")?;
                if let Some(i) = only_valid {
                    write!(f, " The only valid index was: {i}.")?;
                }
                write!(
                    f,
                    " The default combination {defaults:?} was therefore plotted. \
                     Please request at least 2 valid indices, where such indices refer to \
                     columns containing numbers."
                )
            }
        }
    }
}

/// Resolved pairs plus the warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub pairs: Vec<VariablePair>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve a request against a schema. See the module docs for the rules.
pub fn resolve_pairs(
    request: &PairRequest,
    schema: &[SchemaColumn],
    default_indices: &[usize],
) -> Result<Resolution, ResolveError> {
    let res = match request {
        PairRequest::Named(pairs) => Resolution {
            pairs: pairs.clone(),
            diagnostics: Vec::new(),
        },
        PairRequest::Default => resolve_defaults(schema, default_indices, Vec::new())?,
        PairRequest::Indices(indices) => {
            let (valid, mut diagnostics) = validate(indices, schema);
            if valid.len() >= 2 {
                Resolution {
                    pairs: combinations(&names_at(schema, &valid)),
                    diagnostics,
                }
            } else {
                diagnostics.push(Diagnostic::Insufficient {
                    only_valid: valid.first().copied(),
                    defaults: default_indices.to_vec(),
                });
                resolve_defaults(schema, default_indices, diagnostics)?
            }
        }
    };
    for d in &res.diagnostics {
        log::warn!("{d}");
    }
    Ok(res)
}

fn resolve_defaults(
    schema: &[SchemaColumn],
    default_indices: &[usize],
    mut diagnostics: Vec<Diagnostic>,
) -> Result<Resolution, ResolveError> {
    let as_i64: Vec<i64> = default_indices
        .iter()
        .map(|&i| i64::try_from(i).unwrap_or(i64::MAX))
        .collect();
    let (valid, notes) = validate(&as_i64, schema);
    if valid.len() < 2 {
        return Err(ResolveError::DefaultsUnusable {
            defaults: default_indices.to_vec(),
        });
    }
    diagnostics.extend(notes);
    Ok(Resolution {
        pairs: combinations(&names_at(schema, &valid)),
        diagnostics,
    })
}

/// Split positions into distinct valid ones (first-seen order) and diagnostics.
fn validate(indices: &[i64], schema: &[SchemaColumn]) -> (Vec<usize>, Vec<Diagnostic>) {
    let is_valid = |i: i64| {
        usize::try_from(i)
            .ok()
            .and_then(|u| schema.get(u))
            .is_some_and(|c| c.kind == ColumnKind::Numeric)
    };

    let mut invalid: Vec<i64> = Vec::new();
    let mut valid: Vec<usize> = Vec::new();
    let mut dupes: Vec<usize> = Vec::new();
    for &i in indices {
        if !is_valid(i) {
            if !invalid.contains(&i) {
                invalid.push(i);
            }
            continue;
        }
        let u = i as usize;
        if valid.contains(&u) {
            if !dupes.contains(&u) {
                dupes.push(u);
            }
        } else {
            valid.push(u);
        }
    }

    let mut diagnostics = Vec::new();
    if valid.len() >= 2 {
        if !invalid.is_empty() {
            diagnostics.push(Diagnostic::InvalidIndices {
                invalid,
                valid: valid.clone(),
            });
        }
        if !dupes.is_empty() {
            diagnostics.push(Diagnostic::DuplicatesIgnored(dupes));
        }
    }
    (valid, diagnostics)
}

fn names_at(schema: &[SchemaColumn], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| schema[i].name.clone()).collect()
}

/// Every unordered pair, each element paired with every later one.
pub fn combinations<S: AsRef<str>>(names: &[S]) -> Vec<VariablePair> {
    let mut out = Vec::with_capacity(names.len() * names.len().saturating_sub(1) / 2);
    for (i, x) in names.iter().enumerate() {
        for y in &names[i + 1..] {
            out.push(VariablePair::new(x.as_ref(), y.as_ref()));
        }
    }
    out
}

/// Human-readable summary of the current default pairs.
pub fn describe_defaults(schema: &[SchemaColumn], default_indices: &[usize]) -> String {
    match resolve_defaults(schema, default_indices, Vec::new()) {
        Ok(res) => {
            let pairs: Vec<String> = res.pairs.iter().map(ToString::to_string).collect();
            format!(
                "Current default variable combinations are {default_indices:?}, equivalent to [{}]",
                pairs.join(", ")
            )
        }
        Err(e) => format!("Current default indices are {default_indices:?}, but {e}"),
    }
}
