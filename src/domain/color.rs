//! Colors: hex parsing, RGBA composition and ordinal category palettes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Nine-step spectral palette, ordered so neighbouring categories contrast.
pub const DEFAULT_PALETTE: [&str; 9] = [
    "#9e0142", "#3288bd", "#e6f598", "#d53e4f", "#abdda4", "#f46d43", "#66c2a5", "#fdae61",
    "#5e4fa2",
];

fn hex_regex() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^(?i)#?([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})$").expect("static hex pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl fmt::Display for Rgba {
    /// Format as CSS: rgba(r,g,b,a)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Parse a 6-digit hex color with optional leading `#`, case-insensitive.
///
/// Shorthand (`#f00`) and 8-digit forms are rejected.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let caps = hex_regex().captures(hex)?;
    let channel = |i: usize| u8::from_str_radix(caps.get(i)?.as_str(), 16).ok();
    Some(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
}

/// Which key selects a leaf's base color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    /// The leaf's own category, falling back to its parent's name
    #[default]
    Category,
    /// The name of the leaf's parent node
    Parent,
}

impl fmt::Display for ColorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSource::Category => write!(f, "category"),
            ColorSource::Parent => write!(f, "parent"),
        }
    }
}

impl FromStr for ColorSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(ColorSource::Category),
            "parent" => Ok(ColorSource::Parent),
            other => Err(format!(
                "unknown color source '{}' (expected category or parent)",
                other
            )),
        }
    }
}

/// Ordinal scale with an implicit domain.
///
/// The first key seen gets the first color, the next new key the next color,
/// wrapping around when keys outnumber colors. A key keeps its color once assigned.
#[derive(Debug, Clone)]
pub struct OrdinalPalette {
    colors: Vec<Rgb>,
    assigned: HashMap<String, usize>,
}

impl Default for OrdinalPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().filter_map(|hex| hex_to_rgb(hex)).collect(),
            assigned: HashMap::new(),
        }
    }
}

impl OrdinalPalette {
    /// None if `colors` is empty.
    pub fn new(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self {
            colors,
            assigned: HashMap::new(),
        })
    }

    pub fn color(&mut self, key: &str) -> Rgb {
        let next = self.assigned.len();
        let slot = *self.assigned.entry(key.to_string()).or_insert(next);
        self.colors[slot % self.colors.len()]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}
