//! Titles, axis labels, and legend labels, plus a rough text-width estimate
//! (Plotters has no built-in text measuring).

use crate::models::{VariablePair, display_name};

/// Heuristic pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Two-line subplot title: `[Logged ]Primate <x> against\n<y>`.
pub fn subplot_title(pair: &VariablePair, logged: bool) -> String {
    format!(
        "{}Primate {} against\n{}",
        if logged { "Logged " } else { "" },
        display_name(&pair.x),
        display_name(&pair.y)
    )
}

/// Axis description for a column, prefixed with `Log ` on logged plots.
pub fn axis_label(column: &str, logged: bool) -> String {
    format!("{}{}", if logged { "Log " } else { "" }, display_name(column))
}

/// Legend label for an emphasized species: `Homo_sapiens` -> `H. sapiens`,
/// or `Homo sapiens` when `scientific` is false.
pub fn species_label(species: &str, scientific: bool) -> String {
    if scientific {
        if let Some((genus, epithet)) = species.split_once('_') {
            if let Some(initial) = genus.chars().next() {
                return format!("{initial}. {epithet}");
            }
        }
    }
    species.replace('_', " ")
}

/// Box-plot panel title: `Distribution of A\nand B Data`.
pub fn distribution_title(columns: &[String]) -> String {
    let names: Vec<String> = columns.iter().map(|c| display_name(c)).collect();
    match names.split_last() {
        None => "Distribution of Data".to_string(),
        Some((only, [])) => format!("Distribution of {only} Data"),
        Some((last, rest)) => format!("Distribution of {}\nand {last} Data", rest.join(", ")),
    }
}

/// Lines of `text` that fit `max_px`; lines that still overflow end in an ellipsis.
pub fn fit_lines(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    text.lines()
        .map(|line| {
            if estimate_text_width_px(line, font_px) <= max_px {
                return line.to_string();
            }
            let mut out: String = String::new();
            for ch in line.chars() {
                if estimate_text_width_px(&format!("{out}{ch}…"), font_px) > max_px {
                    break;
                }
                out.push(ch);
            }
            out.push('…');
            out
        })
        .collect()
}
