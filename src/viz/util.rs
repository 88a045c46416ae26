//! Utility functions for visualization: colors, axis ranges, ticks, number formatting.

use crate::style::Rgb;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use std::path::Path;

use super::types::LegendLocation;

#[inline]
pub fn to_rgb(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

pub fn legend_position(loc: LegendLocation) -> SeriesLabelPosition {
    match loc {
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
    }
}

/// Marker radius in pixels for a marker area given in points squared (default 36).
pub fn marker_radius(size: Option<f64>, dpi: f64) -> i32 {
    let area = size.filter(|s| *s > 0.0).unwrap_or(36.0);
    let diameter_px = area.sqrt() * dpi / 72.0;
    ((diameter_px / 2.0).round() as i32).max(1)
}

/// Data range widened by 5% on each side; a degenerate range is widened by 1.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if (max - min).abs() < f64::EPSILON {
        return Some((min - 1.0, max + 1.0));
    }
    let pad = (max - min) * 0.05;
    Some((min - pad, max + pad))
}

/// Tick positions for log-transformed data: every 0.5 from `floor(min)` up to
/// `ceil(max)` (exclusive), skipping anything below -0.5.
pub fn log_ticks(min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let start = min.floor();
    let end = max.ceil();
    let steps = ((end - start) / 0.5).round() as i64;
    (0..steps)
        .map(|i| start + i as f64 * 0.5)
        .filter(|t| *t >= -0.5)
        .collect()
}

/// True for paths ending in `.svg` (any case); everything else renders as PNG.
pub fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Tick label: thousands separators for large values, up to two decimals for small ones.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        let n = v.round() as i64;
        n.to_formatted_string(&Locale::en)
    } else if a >= 100.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else if a >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}
