//! Public types describing one figure: what to plot and how to style it.

use crate::layout::{DEFAULT_DPI, Layout};
use crate::models::{Dataset, FAMILY_COLUMN, PlotKind, SPECIES_COLUMN, VariablePair};
use crate::stats::GroupBy;
use crate::style::{ColorMap, MarkerShape};
use anyhow::{Result, anyhow, bail};
use std::str::FromStr;

/// Where the family legend sits inside each subplot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendLocation {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    UpperCenter,
    LowerCenter,
}

impl FromStr for LegendLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match norm.as_str() {
            "upper left" => Ok(Self::UpperLeft),
            "upper right" => Ok(Self::UpperRight),
            "lower left" => Ok(Self::LowerLeft),
            "lower right" => Ok(Self::LowerRight),
            "upper center" => Ok(Self::UpperCenter),
            "lower center" => Ok(Self::LowerCenter),
            other => Err(format!("unknown legend location '{other}'")),
        }
    }
}

/// Plot group means instead of (or on top of) the individual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Means {
    pub by: GroupBy,
    /// Draw the means as squares over the raw points instead of replacing them.
    pub overlay: bool,
}

/// Points to emphasize in every subplot: one species or a whole family.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// Species (`Homo_sapiens`) or family (`Hominidae`) name.
    pub target: String,
    /// Fade all other points to `alpha`.
    pub with_highlight: bool,
    /// Face color; defaults to the target family's color.
    pub color: Option<String>,
    /// Edge color; defaults to the figure edge color.
    pub edgecolor: Option<String>,
    pub alpha: f64,
    /// Marker area in points squared.
    pub size: Option<f64>,
    pub linewidth: f64,
    pub with_arrows: bool,
    /// Legend label as `H. sapiens` rather than `Homo sapiens`.
    pub scientific_name: bool,
    /// Add a legend entry for a species target.
    pub legend: bool,
}

impl Highlight {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            with_highlight: true,
            color: None,
            edgecolor: None,
            alpha: 0.2,
            size: None,
            linewidth: 1.5,
            with_arrows: false,
            scientific_name: true,
            legend: true,
        }
    }

    /// Column the target was found in: `Species` or `Family`.
    pub fn resolve_rank<'d>(&self, ds: &'d Dataset) -> Result<&'d str> {
        let target = self.target.as_str();
        let rank = ds
            .rank_of(target)
            .ok_or_else(|| anyhow!("'{target}' is not a species or family in the dataset"))?;
        if rank != SPECIES_COLUMN && rank != FAMILY_COLUMN {
            bail!("'{target}' was found in column '{rank}', expected a species or family name");
        }
        Ok(rank)
    }
}

/// Everything needed to draw one figure of scatter subplots.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub pairs: Vec<VariablePair>,
    pub kind: PlotKind,
    pub colors: ColorMap,
    pub layout: Layout,
    pub title: Option<String>,
    pub edgecolor: String,
    pub marker: MarkerShape,
    pub legend_loc: LegendLocation,
    pub means: Option<Means>,
    pub highlight: Option<Highlight>,
    pub dpi: f64,
}

impl FigureSpec {
    /// Figure with the layout heuristic and default styling.
    pub fn new(pairs: Vec<VariablePair>, kind: PlotKind, colors: ColorMap) -> Self {
        let layout = Layout::for_pairs(pairs.len());
        Self {
            pairs,
            kind,
            colors,
            layout,
            title: None,
            edgecolor: "k".to_string(),
            marker: MarkerShape::Circle,
            legend_loc: LegendLocation::UpperLeft,
            means: None,
            highlight: None,
            dpi: DEFAULT_DPI,
        }
    }
}
