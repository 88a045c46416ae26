//! Font registration for the `ab_glyph` text path, which does not discover OS fonts.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable naming a TrueType font to use for all figure text.
pub const FONT_ENV: &str = "CBP_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static TEXT_READY: OnceLock<bool> = OnceLock::new();

/// Whether a "sans-serif" font is registered. Runs the lookup once.
///
/// Without a font, figures are still drawn but carry no titles, labels, or legends.
pub fn text_available() -> bool {
    *TEXT_READY.get_or_init(register_first_font)
}

fn register_first_font() -> bool {
    let candidates = std::env::var_os(FONT_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        // Registered font data must be 'static.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            bytes,
        )
        .is_ok()
        {
            log::debug!("registered figure font {}", path.display());
            return true;
        }
        log::debug!("{} is not a usable font", path.display());
    }
    log::warn!("no TrueType font found; figures are drawn without text (set {FONT_ENV})");
    false
}
