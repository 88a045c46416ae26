//! Family legend: which entries appear, in what order, and how they are drawn.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::chart::SeriesAnno;
use plotters::prelude::*;
use plotters::style::FontFamily;

use super::types::LegendLocation;
use super::util::legend_position;
use crate::style::ColorMap;

/// Families in legend order: color-map order first, then any family found in
/// the data but missing from the map, in order of appearance.
pub fn family_order<'a>(colors: &'a ColorMap, data_families: &[Option<&'a str>]) -> Vec<&'a str> {
    let mut order: Vec<&str> = colors.families().collect();
    for fam in data_families.iter().flatten() {
        if !order.contains(fam) {
            log::debug!("family '{fam}' has no color; drawing it in gray");
            order.push(*fam);
        }
    }
    order
}

/// Label a drawn series and give it a round legend glyph filled with `color`
/// and outlined with `edge`.
pub fn attach<'a, DB: DrawingBackend + 'a>(
    anno: &mut SeriesAnno<'a, DB>,
    label: &str,
    color: RGBColor,
    edge: ShapeStyle,
) {
    anno.label(label).legend(move |(x, y)| {
        EmptyElement::at((x, y))
            + Circle::new((0, 0), 4, color.filled())
            + Circle::new((0, 0), 4, edge)
    });
}

/// Outline of a family's legend glyph: the emphasis outline for the
/// emphasized family, the figure's marker edge for every other one.
pub fn family_edge(
    family: &str,
    figure_edge: ShapeStyle,
    emphasized: Option<(&str, ShapeStyle)>,
) -> ShapeStyle {
    match emphasized {
        Some((target, style)) if target == family => style,
        _ => figure_edge,
    }
}

/// Draw the labelled series as a boxed legend inside the plotting area.
pub fn draw_inside<'a, DB, CT>(chart: &mut ChartContext<'a, DB, CT>, loc: LegendLocation) -> Result<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate,
{
    chart
        .configure_series_labels()
        .position(legend_position(loc))
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 11))
        .draw()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasized_family_takes_the_emphasis_outline() {
        let figure_edge = BLACK.stroke_width(1);
        let emph_edge = RED.stroke_width(2);
        let emphasized = Some(("Hylobatidae", emph_edge));

        let hit = family_edge("Hylobatidae", figure_edge, emphasized);
        assert_eq!(hit.stroke_width, 2);
        assert_eq!(hit.color.to_backend_color().rgb, (255, 0, 0));

        let other = family_edge("Hominidae", figure_edge, emphasized);
        assert_eq!(other.stroke_width, 1);
        assert_eq!(other.color.to_backend_color().rgb, (0, 0, 0));

        assert_eq!(family_edge("Hylobatidae", figure_edge, None).stroke_width, 1);
    }

    #[test]
    fn unmapped_families_follow_the_map() {
        let colors = ColorMap::original();
        let data = [Some("Lemuridae"), Some("Hominidae"), None, Some("Lemuridae")];
        let order = family_order(&colors, &data);
        assert_eq!(
            order,
            [
                "Hominidae",
                "Hylobatidae",
                "Cercopithecidae",
                "Platyrrhini",
                "Lemuridae"
            ]
        );
    }
}
