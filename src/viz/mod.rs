//! Visualization: render scatter figures of variable pairs to **PNG** or **SVG**.
//!
//! - One subplot per variable pair, laid out on the figure grid
//! - Points colored by family, with an inside legend per subplot
//! - Logged figures plot natural-log values with half-step ticks
//! - Optional group means (replacing or overlaying the rows)
//! - Optional emphasis of one species or family
//! - Box plots of the surface-area and volume columns ([`boxplot`])

pub mod boxplot;
pub mod fonts;
pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use boxplot::{Distribution, render_distributions};
pub use types::{FigureSpec, Highlight, LegendLocation, Means};

use crate::models::{Dataset, FAMILY_COLUMN, VariablePair};
use crate::stats::{group_means, log_transform};
use crate::style::{ColorMap, MarkerShape, Rgb, UNMAPPED_COLOR};
use anyhow::{Result, anyhow, bail};

use plotters::backend::DrawingBackend;
use plotters::chart::SeriesAnno;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use util::{format_tick, is_svg_path, log_ticks, marker_radius, padded_range, to_rgb};

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const TITLE_FONT_PX: u32 = 13;
const OVERLAY_EDGE: Rgb = Rgb::new(0, 0, 205);

/// Emphasis resolved against the rows being drawn.
struct Emphasis {
    /// `mask[row]` is true for rows of the emphasized species/family.
    mask: Vec<bool>,
    fill: Rgb,
    edge: Rgb,
    /// Alpha of every other point.
    others_alpha: f64,
    radius: i32,
    stroke: u32,
    arrows: bool,
    /// Extra legend entry (species targets only).
    label: Option<String>,
    /// Emphasized family, whose legend glyph takes the emphasis outline.
    family: Option<String>,
}

/// Everything a subplot needs, resolved once per figure.
struct Scene<'s> {
    data: &'s Dataset,
    overlay: Option<&'s Dataset>,
    spec: &'s FigureSpec,
    colors: &'s ColorMap,
    edge: Rgb,
    emphasis: Option<&'s Emphasis>,
    text: bool,
}

/// Draw `spec` from `ds` into `out_path` (SVG for `.svg`, PNG otherwise).
pub fn render_figure<P: AsRef<Path>>(ds: &Dataset, spec: &FigureSpec, out_path: P) -> Result<()> {
    if spec.pairs.is_empty() {
        bail!("no variable pairs to plot");
    }
    spec.layout.check(spec.pairs.len())?;
    for pair in &spec.pairs {
        for col in [&pair.x, &pair.y] {
            if ds.numeric(col).is_none() {
                bail!("'{col}' is not a numeric column of the dataset");
            }
        }
    }

    let base = if spec.kind.is_logged() {
        log_transform(ds)
    } else {
        ds.clone()
    };
    let (data, overlay) = match spec.means {
        None => (base, None),
        Some(m) if m.overlay => {
            let means = group_means(&base, m.by)?;
            (base, Some(means))
        }
        Some(m) => (group_means(&base, m.by)?, None),
    };

    let edge = Rgb::parse(&spec.edgecolor)
        .ok_or_else(|| anyhow!("'{}' is not a valid edge color", spec.edgecolor))?;
    let mut colors = spec.colors.clone();
    let emphasis = match &spec.highlight {
        Some(h) => Some(resolve_emphasis(ds, &data, h, &mut colors, edge, spec.dpi)?),
        None => None,
    };

    let scene = Scene {
        data: &data,
        overlay: overlay.as_ref(),
        spec,
        colors: &colors,
        edge,
        emphasis: emphasis.as_ref(),
        text: fonts::text_available(),
    };

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = spec.layout.pixels(spec.dpi);
    if is_svg_path(out_path) {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, &scene)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, &scene)?;
    }
    log::debug!(
        "rendered {} plot(s) to {}",
        spec.pairs.len(),
        out_path.display()
    );
    Ok(())
}

fn resolve_emphasis(
    source: &Dataset,
    data: &Dataset,
    h: &Highlight,
    colors: &mut ColorMap,
    default_edge: Rgb,
    dpi: f64,
) -> Result<Emphasis> {
    let target = h.target.as_str();
    let rank = h.resolve_rank(source)?;
    let is_family = rank == FAMILY_COLUMN;

    let family = if is_family {
        Some(target)
    } else {
        let row = source
            .text(rank)
            .and_then(|cells| cells.iter().position(|c| c.as_deref() == Some(target)));
        row.and_then(|r| source.families().get(r).copied().flatten())
    };
    let token = match (&h.color, family) {
        (Some(c), _) => c.clone(),
        (None, Some(f)) => colors.get(f).unwrap_or("gray").to_string(),
        (None, None) => "gray".to_string(),
    };
    let fill = Rgb::parse(&token).ok_or_else(|| anyhow!("'{token}' is not a valid color"))?;
    let edge = match &h.edgecolor {
        Some(e) => Rgb::parse(e).ok_or_else(|| anyhow!("'{e}' is not a valid color"))?,
        None => default_edge,
    };
    if is_family {
        colors.set(target, &token);
    }

    let mask = match data.text(rank) {
        Some(cells) => cells.iter().map(|c| c.as_deref() == Some(target)).collect(),
        None => vec![false; data.row_count()],
    };
    Ok(Emphasis {
        mask,
        fill,
        edge,
        others_alpha: if h.with_highlight {
            h.alpha.clamp(0.0, 1.0)
        } else {
            1.0
        },
        radius: marker_radius(h.size, dpi),
        stroke: h.linewidth.round().max(1.0) as u32,
        arrows: h.with_arrows,
        label: (h.legend && !is_family).then(|| text::species_label(target, h.scientific_name)),
        family: is_family.then(|| target.to_string()),
    })
}

fn draw_figure<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, scene: &Scene<'_>) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let titled;
    let body = match scene.spec.title.as_deref().map(str::trim) {
        Some(t) if scene.text && !t.is_empty() => {
            titled = root
                .titled(t, (FontFamily::SansSerif, 22))
                .map_err(|e| anyhow!("{:?}", e))?;
            &titled
        }
        _ => &root,
    };

    let cells = body.split_evenly(scene.spec.layout.grid);
    for (pair, cell) in scene.spec.pairs.iter().zip(cells.iter()) {
        if scene.text {
            let (w, _) = cell.dim_in_pixel();
            let lines = text::fit_lines(
                &text::subplot_title(pair, scene.spec.kind.is_logged()),
                TITLE_FONT_PX,
                w.saturating_sub(12),
            );
            let band = lines.len() as i32 * (TITLE_FONT_PX as i32 + 4) + 8;
            let (top, rest) = cell.split_vertically(band);
            let style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
                .pos(Pos::new(HPos::Center, VPos::Top));
            for (i, line) in lines.iter().enumerate() {
                let y = 6 + i as i32 * (TITLE_FONT_PX as i32 + 4);
                top.draw(&Text::new(line.clone(), (w as i32 / 2, y), style.clone()))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            draw_subplot(&rest, pair, scene)?;
        } else {
            draw_subplot(cell, pair, scene)?;
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Rows with both values present and finite, as `(row, x, y)`.
fn xy_points(ds: &Dataset, pair: &VariablePair) -> Vec<(usize, f64, f64)> {
    let (Some(xs), Some(ys)) = (ds.numeric(&pair.x), ds.numeric(&pair.y)) else {
        return Vec::new();
    };
    xs.iter()
        .zip(ys)
        .enumerate()
        .filter_map(|(i, (x, y))| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((i, *x, *y)),
            _ => None,
        })
        .collect()
}

/// Axis range for one dimension, snapped to the half-step ticks on logged plots.
fn axis_range(values: &[f64], logged: bool) -> (f64, f64, usize) {
    let (lo, hi) = padded_range(values.iter().copied()).unwrap_or((0.0, 1.0));
    if !logged {
        return (lo, hi, 8);
    }
    let raw_lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let raw_hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ticks = log_ticks(raw_lo, raw_hi);
    match (ticks.first(), ticks.last()) {
        (Some(&first), Some(&last)) => (lo.min(first), hi.max(last), ticks.len().max(2)),
        _ => (lo, hi, 8),
    }
}

fn draw_subplot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pair: &VariablePair,
    scene: &Scene<'_>,
) -> Result<()> {
    let spec = scene.spec;
    let logged = spec.kind.is_logged();
    let points = xy_points(scene.data, pair);
    let overlay_points = scene
        .overlay
        .map(|m| xy_points(m, pair))
        .unwrap_or_default();

    let all = points.iter().chain(overlay_points.iter());
    let xs: Vec<f64> = all.clone().map(|p| p.1).collect();
    let ys: Vec<f64> = all.map(|p| p.2).collect();
    let (x0, x1, x_labels) = axis_range(&xs, logged);
    let (y0, y1, y_labels) = axis_range(&ys, logged);

    let mut builder = ChartBuilder::on(area);
    builder.margin(8);
    if scene.text {
        builder.x_label_area_size(36).y_label_area_size(56);
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow!("{:?}", e))?;

    let tick_fmt = |v: &f64| format_tick(*v);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh();
    if scene.text {
        mesh.x_desc(text::axis_label(&pair.x, logged))
            .y_desc(text::axis_label(&pair.y, logged))
            .x_labels(x_labels)
            .y_labels(y_labels)
            .x_label_formatter(&tick_fmt)
            .y_label_formatter(&tick_fmt)
            .label_style((FontFamily::SansSerif, 11))
            .axis_desc_style((FontFamily::SansSerif, 12));
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw().map_err(|e| anyhow!("{:?}", e))?;

    let radius = marker_radius(None, spec.dpi);
    let edge = to_rgb(scene.edge).stroke_width(1);
    let others_alpha = scene.emphasis.map_or(1.0, |e| e.others_alpha);
    let emphasized_family = scene.emphasis.and_then(|e| {
        let style = to_rgb(e.edge).stroke_width(e.stroke);
        e.family.as_deref().map(|f| (f, style))
    });

    // One series per family so each gets its own legend entry.
    let row_family = scene.data.families();
    for family in legend::family_order(scene.colors, &row_family) {
        let pts: Vec<(f64, f64)> = points
            .iter()
            .filter(|(i, _, _)| row_family[*i] == Some(family))
            .map(|&(_, x, y)| (x, y))
            .collect();
        let color = to_rgb(scene.colors.rgb(family));
        let fill = color.mix(others_alpha).filled();
        let anno = draw_markers(&mut chart, &pts, spec.marker, radius, fill, edge)?;
        if scene.text {
            let glyph_edge = legend::family_edge(family, edge, emphasized_family);
            legend::attach(anno, family, color, glyph_edge);
        }
    }
    let unlabelled: Vec<(f64, f64)> = points
        .iter()
        .filter(|(i, _, _)| row_family[*i].is_none())
        .map(|&(_, x, y)| (x, y))
        .collect();
    if !unlabelled.is_empty() {
        let fill = to_rgb(UNMAPPED_COLOR).mix(others_alpha).filled();
        draw_markers(&mut chart, &unlabelled, spec.marker, radius, fill, edge)?;
    }

    if let Some(means) = scene.overlay {
        let mean_family = means.families();
        let square_edge = to_rgb(OVERLAY_EDGE).stroke_width(2);
        let square = marker_radius(Some(35.0), spec.dpi);
        for &(i, x, y) in &overlay_points {
            let fill = mean_family[i]
                .map_or(to_rgb(UNMAPPED_COLOR), |f| to_rgb(scene.colors.rgb(f)))
                .filled();
            draw_markers(
                &mut chart,
                &[(x, y)],
                MarkerShape::Square,
                square,
                fill,
                square_edge,
            )?;
        }
    }

    if let Some(emph) = scene.emphasis {
        let pts: Vec<(f64, f64)> = points
            .iter()
            .filter(|(i, _, _)| emph.mask.get(*i).copied().unwrap_or(false))
            .map(|&(_, x, y)| (x, y))
            .collect();
        let fill = to_rgb(emph.fill).mix(0.85).filled();
        let stroke = to_rgb(emph.edge).stroke_width(emph.stroke);
        let anno = draw_markers(&mut chart, &pts, spec.marker, emph.radius, fill, stroke)?;
        if let Some(label) = emph.label.as_deref().filter(|_| scene.text && !pts.is_empty()) {
            legend::attach(anno, label, to_rgb(emph.fill), stroke);
        }
        if emph.arrows {
            draw_arrows(&mut chart, &pts)?;
        }
    }

    if scene.text {
        legend::draw_inside(&mut chart, spec.legend_loc)?;
    }
    Ok(())
}

/// Draw one marker per point; the returned annotation can be labelled for the legend.
fn draw_markers<'a, 'c, DB: DrawingBackend + 'a>(
    chart: &'c mut Chart<'a, DB>,
    points: &[(f64, f64)],
    shape: MarkerShape,
    r: i32,
    fill: ShapeStyle,
    edge: ShapeStyle,
) -> Result<&'c mut SeriesAnno<'a, DB>> {
    let pts = points.iter().copied();
    let drawn = match shape {
        MarkerShape::Circle => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c) + Circle::new((0, 0), r, fill) + Circle::new((0, 0), r, edge)
        })),
        MarkerShape::Square => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c)
                + Rectangle::new([(-r, -r), (r, r)], fill)
                + Rectangle::new([(-r, -r), (r, r)], edge)
        })),
        MarkerShape::Triangle => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c)
                + Polygon::new(vec![(0, -r), (-r, r), (r, r)], fill)
                + PathElement::new(vec![(0, -r), (-r, r), (r, r), (0, -r)], edge)
        })),
        MarkerShape::Diamond => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c)
                + Polygon::new(vec![(0, -r), (-r, 0), (0, r), (r, 0)], fill)
                + PathElement::new(vec![(0, -r), (-r, 0), (0, r), (r, 0), (0, -r)], edge)
        })),
        MarkerShape::Cross => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c)
                + PathElement::new(vec![(-r, 0), (r, 0)], fill.stroke_width(2))
                + PathElement::new(vec![(0, -r), (0, r)], fill.stroke_width(2))
        })),
        MarkerShape::X => chart.draw_series(pts.map(move |c| {
            EmptyElement::at(c)
                + PathElement::new(vec![(-r, -r), (r, r)], fill.stroke_width(2))
                + PathElement::new(vec![(-r, r), (r, -r)], fill.stroke_width(2))
        })),
    };
    drawn.map_err(|e| anyhow!("{:?}", e))
}

/// Arrow from up and to the right of each point, pointing at it.
fn draw_arrows<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    points: &[(f64, f64)],
) -> Result<()> {
    let style = BLACK.stroke_width(1);
    chart
        .draw_series(points.iter().map(move |&c| {
            EmptyElement::at(c)
                + PathElement::new(vec![(25, -20), (4, -3)], style)
                + PathElement::new(vec![(12, -5), (4, -3), (8, -10)], style)
        }))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
