//! Tile labels and value display.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Break a name into label lines.
///
/// A new line starts before every ASCII uppercase letter that is followed by
/// a non-uppercase character, except at the very start: `"WiiSports"` becomes
/// `["Wii", "Sports"]`, while a trailing run of capitals such as `"NBA"` stays
/// on one line.
pub fn split_label(name: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    for window in chars.windows(2) {
        let ((pos, current), (_, next)) = (window[0], window[1]);
        if pos > 0 && current.is_ascii_uppercase() && !next.is_ascii_uppercase() {
            lines.push(name[start..pos].to_string());
            start = pos;
        }
    }
    lines.push(name[start..].to_string());
    lines
}

/// How leaf values are rendered for display (tooltips, tables).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Shortest float representation, e.g. `82.53`
    #[default]
    Plain,
    /// Thousands separators, at most two decimals, e.g. `1,234.5`
    Grouped,
    /// Whole dollars with separators, e.g. `$760,505,847`
    Currency,
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormat::Plain => value.to_string(),
            ValueFormat::Grouped => group(value, 2),
            ValueFormat::Currency => {
                let grouped = group(value.abs(), 0);
                if value < 0.0 && grouped != "0" {
                    format!("-${}", grouped)
                } else {
                    format!("${}", grouped)
                }
            }
        }
    }
}

fn group(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueFormat::Plain => "plain",
            ValueFormat::Grouped => "grouped",
            ValueFormat::Currency => "currency",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(ValueFormat::Plain),
            "grouped" => Ok(ValueFormat::Grouped),
            "currency" => Ok(ValueFormat::Currency),
            other => Err(format!(
                "unknown value format '{}' (expected plain, grouped or currency)",
                other
            )),
        }
    }
}
