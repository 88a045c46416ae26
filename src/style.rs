//! Color tokens, the family color map, and marker shapes.
//!
//! Colors are written the way plotting users usually write them: a hex code
//! (`#7f48b5`, `#fff`) or a named color (`black`, `k`, `mediumblue`, ...).
//! Tokens are kept as written so they round-trip through configuration files,
//! and are parsed to [`Rgb`] when drawing.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex code or a named color.
    pub fn parse(token: &str) -> Option<Self> {
        let t = token.trim();
        if let Some(hex) = t.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = t.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Rgb::new(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Some(Rgb::new(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
        _ => None,
    }
}

/// Single-letter shorthands plus the named colors most used for scatter plots.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("b", Rgb::new(0, 0, 255)),
    ("g", Rgb::new(0, 128, 0)),
    ("r", Rgb::new(255, 0, 0)),
    ("c", Rgb::new(0, 191, 191)),
    ("m", Rgb::new(191, 0, 191)),
    ("y", Rgb::new(191, 191, 0)),
    ("k", Rgb::new(0, 0, 0)),
    ("w", Rgb::new(255, 255, 255)),
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("mediumblue", Rgb::new(0, 0, 205)),
    ("navy", Rgb::new(0, 0, 128)),
    ("orange", Rgb::new(255, 165, 0)),
    ("gold", Rgb::new(255, 215, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("violet", Rgb::new(238, 130, 238)),
    ("pink", Rgb::new(255, 192, 203)),
    ("brown", Rgb::new(165, 42, 42)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("teal", Rgb::new(0, 128, 128)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("tab:blue", Rgb::new(31, 119, 180)),
    ("tab:orange", Rgb::new(255, 127, 14)),
    ("tab:green", Rgb::new(44, 160, 44)),
    ("tab:red", Rgb::new(214, 39, 40)),
];

/// Color used for rows whose family is not in the map.
pub const UNMAPPED_COLOR: Rgb = Rgb::new(160, 160, 160);

/// Ordered family -> color token map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap(Vec<(String, String)>);

impl Default for ColorMap {
    fn default() -> Self {
        Self::original()
    }
}

impl ColorMap {
    /// Built-in family colors.
    pub fn original() -> Self {
        Self(
            [
                ("Hominidae", "#7f48b5"),
                ("Hylobatidae", "#c195ed"),
                ("Cercopithecidae", "#f0bb3e"),
                ("Platyrrhini", "#f2e3bd"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        )
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn get(&self, family: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == family)
            .map(|(_, v)| v.as_str())
    }

    /// Parsed color for a family, falling back to [`UNMAPPED_COLOR`].
    pub fn rgb(&self, family: &str) -> Rgb {
        self.get(family)
            .and_then(Rgb::parse)
            .unwrap_or(UNMAPPED_COLOR)
    }

    /// Copy with some families recolored. Every key must already be in the map
    /// and every token must parse; nothing is applied otherwise.
    pub fn with_overrides<K, V>(&self, overrides: &[(K, V)]) -> Result<ColorMap, ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let unknown: Vec<String> = overrides
            .iter()
            .map(|(k, _)| k.as_ref())
            .filter(|k| self.get(k).is_none())
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownFamily(unknown));
        }
        let mut out = self.clone();
        for (k, v) in overrides {
            let (k, v) = (k.as_ref(), v.as_ref());
            if Rgb::parse(v).is_none() {
                return Err(ConfigError::InvalidColor(v.to_string()));
            }
            out.set(k, v);
        }
        Ok(out)
    }

    /// Recolor or add a family without validation.
    pub(crate) fn set(&mut self, family: &str, token: &str) {
        match self.0.iter_mut().find(|(k, _)| k == family) {
            Some(entry) => entry.1 = token.to_string(),
            None => self.0.push((family.to_string(), token.to_string())),
        }
    }
}

/// Marker shape for data points, parsed from the usual one-letter codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
    X,
}

impl FromStr for MarkerShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "o" | "circle" => Ok(MarkerShape::Circle),
            "s" | "square" => Ok(MarkerShape::Square),
            "^" | "triangle" => Ok(MarkerShape::Triangle),
            "D" | "d" | "diamond" => Ok(MarkerShape::Diamond),
            "+" | "cross" => Ok(MarkerShape::Cross),
            "x" => Ok(MarkerShape::X),
            other => Err(format!("unknown marker '{other}' (use o, s, ^, D, + or x)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(Rgb::parse("#7f48b5"), Some(Rgb::new(0x7f, 0x48, 0xb5)));
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse("k"), Some(Rgb::new(0, 0, 0)));
        assert_eq!(Rgb::parse("MediumBlue"), Some(Rgb::new(0, 0, 205)));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("not-a-color"), None);
    }

    #[test]
    fn overrides_must_name_known_families() {
        let map = ColorMap::original();
        let err = map.with_overrides(&[("Felidae", "red")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFamily(ref k) if k == &["Felidae".to_string()]));

        let err = map.with_overrides(&[("Hominidae", "ultraviolet")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor(_)));

        let updated = map.with_overrides(&[("Hominidae", "red")]).unwrap();
        assert_eq!(updated.get("Hominidae"), Some("red"));
        assert_eq!(updated.get("Hylobatidae"), Some("#c195ed"));
        assert_eq!(map.get("Hominidae"), Some("#7f48b5"));
    }

    #[test]
    fn markers_parse_from_codes() {
        assert_eq!("o".parse::<MarkerShape>(), Ok(MarkerShape::Circle));
        assert_eq!("D".parse::<MarkerShape>(), Ok(MarkerShape::Diamond));
        assert!("?".parse::<MarkerShape>().is_err());
    }
}
