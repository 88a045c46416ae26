//! Box plots of the surface-area and volume measurements, one panel per
//! measurement group, written side by side to PNG or SVG.

use super::fonts;
use super::text;
use super::util::{format_tick, is_svg_path, padded_range, to_rgb};
use crate::models::{Dataset, display_name};
use crate::style::Rgb;
use anyhow::{Result, anyhow, bail};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::data::Quartiles;
use plotters::element::Boxplot;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

const PANEL_PX: (u32, u32) = (520, 560);
const TITLE_FONT_PX: u32 = 14;
const BOX_COLOR: Rgb = Rgb::new(31, 119, 180);
const OUTLIER_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Measurement group shown in one box-plot panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Columns whose name contains `Area`.
    SurfaceArea,
    /// Columns whose name contains `Volume`.
    Volume,
}

impl Distribution {
    fn name_part(self) -> &'static str {
        match self {
            Distribution::SurfaceArea => "Area",
            Distribution::Volume => "Volume",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Distribution::SurfaceArea => "Surface Area (cm^2)",
            Distribution::Volume => "Volume (cm^3)",
        }
    }

    /// Numeric columns of this group with their finite values, in dataset order.
    /// Columns with no finite value are left out.
    pub fn columns(self, ds: &Dataset) -> Vec<(String, Vec<f64>)> {
        ds.columns()
            .iter()
            .filter(|c| c.name.contains(self.name_part()))
            .filter_map(|c| {
                let values: Vec<f64> = ds
                    .numeric(&c.name)?
                    .iter()
                    .flatten()
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect();
                (!values.is_empty()).then(|| (c.name.clone(), values))
            })
            .collect()
    }
}

struct Panel {
    kind: Distribution,
    columns: Vec<(String, Vec<f64>)>,
}

/// Draw one box-plot panel per entry of `kinds` into `out_path`
/// (SVG for `.svg`, PNG otherwise).
pub fn render_distributions<P: AsRef<Path>>(
    ds: &Dataset,
    kinds: &[Distribution],
    out_path: P,
) -> Result<()> {
    if kinds.is_empty() {
        bail!("no distributions requested");
    }
    let mut panels = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let columns = kind.columns(ds);
        if columns.is_empty() {
            bail!(
                "the dataset has no {} columns with data",
                kind.name_part().to_lowercase()
            );
        }
        panels.push(Panel { kind, columns });
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (PANEL_PX.0 * panels.len() as u32, PANEL_PX.1);
    let text = fonts::text_available();
    if is_svg_path(out_path) {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_panels(root, &panels, text)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_panels(root, &panels, text)?;
    }
    log::debug!(
        "rendered {} box-plot panel(s) to {}",
        panels.len(),
        out_path.display()
    );
    Ok(())
}

fn draw_panels<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    panels: &[Panel],
    text: bool,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let cells = root.split_evenly((1, panels.len()));
    for (panel, cell) in panels.iter().zip(cells.iter()) {
        if text {
            let names: Vec<String> = panel.columns.iter().map(|(c, _)| c.clone()).collect();
            let (w, _) = cell.dim_in_pixel();
            let lines = text::fit_lines(
                &text::distribution_title(&names),
                TITLE_FONT_PX,
                w.saturating_sub(12),
            );
            let band = lines.len() as i32 * (TITLE_FONT_PX as i32 + 4) + 10;
            let (top, rest) = cell.split_vertically(band);
            let style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
                .pos(Pos::new(HPos::Center, VPos::Top));
            for (i, line) in lines.iter().enumerate() {
                let y = 6 + i as i32 * (TITLE_FONT_PX as i32 + 4);
                top.draw(&Text::new(line.clone(), (w as i32 / 2, y), style.clone()))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            draw_panel(&rest, panel, text)?;
        } else {
            draw_panel(cell, panel, text)?;
        }
    }
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    text: bool,
) -> Result<()> {
    let quartiles: Vec<Quartiles> = panel
        .columns
        .iter()
        .map(|(_, values)| Quartiles::new(values.as_slice()))
        .collect();
    // Fences are not clipped to the data, so both go into the range.
    let values = panel.columns.iter().flat_map(|(_, v)| v.iter().copied());
    let fences = quartiles
        .iter()
        .flat_map(|q| q.values().into_iter().map(f64::from));
    let (lo, hi) = padded_range(values.chain(fences)).unwrap_or((0.0, 1.0));

    let n = panel.columns.len() as i32;
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if text {
        builder.x_label_area_size(40).y_label_area_size(64);
    }
    let mut chart = builder
        .build_cartesian_2d((0..n).into_segmented(), (lo as f32)..(hi as f32))
        .map_err(|e| anyhow!("{:?}", e))?;

    let names: Vec<String> = panel.columns.iter().map(|(c, _)| display_name(c)).collect();
    let x_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| names.get(i).cloned())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };
    let y_fmt = |v: &f32| format_tick(f64::from(*v));
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh();
    if text {
        mesh.x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .y_desc(panel.kind.y_label())
            .label_style((FontFamily::SansSerif, 11))
            .axis_desc_style((FontFamily::SansSerif, 12));
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw().map_err(|e| anyhow!("{:?}", e))?;

    let box_style = to_rgb(BOX_COLOR).stroke_width(2);
    chart
        .draw_series(quartiles.iter().enumerate().map(|(i, q)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), q)
                .width(40)
                .whisker_width(0.5)
                .style(box_style)
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    let outlier_style = to_rgb(OUTLIER_COLOR).stroke_width(1);
    for (i, ((_, values), q)) in panel.columns.iter().zip(&quartiles).enumerate() {
        let [low_fence, _, _, _, high_fence] = q.values();
        chart
            .draw_series(
                values
                    .iter()
                    .map(|&v| v as f32)
                    .filter(|&v| v < low_fence || v > high_fence)
                    .map(|v| Circle::new((SegmentValue::CenterOf(i as i32), v), 3, outlier_style)),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::text("Species", vec![Some("Homo_sapiens"), Some("Pan_troglodytes"), Some("Hylobates_lar")]),
            Column::numeric("CerebellumVolume", vec![Some(137.0), Some(50.2), None]),
            Column::numeric("CerebrumVolume", vec![Some(1170.0), Some(330.0), Some(84.0)]),
            Column::numeric("CerebellumSurfaceArea", vec![None, None, None]),
            Column::text("VolumeSource", vec![Some("A"), Some("B"), Some("C")]),
        ])
        .unwrap()
    }

    #[test]
    fn columns_are_picked_by_name_and_need_data() {
        let ds = dataset();
        let volume = Distribution::Volume.columns(&ds);
        let names: Vec<&str> = volume.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["CerebellumVolume", "CerebrumVolume"]);
        assert_eq!(volume[0].1, vec![137.0, 50.2]);

        // The only area column is empty.
        assert!(Distribution::SurfaceArea.columns(&ds).is_empty());
    }

    #[test]
    fn groups_without_data_are_errors() {
        let tmp = std::env::temp_dir().join("cbp-boxplot-no-area.png");
        let err = render_distributions(&dataset(), &[Distribution::SurfaceArea], &tmp).unwrap_err();
        assert!(err.to_string().contains("no area columns"));
        assert!(render_distributions(&dataset(), &[], &tmp).is_err());
    }
}
