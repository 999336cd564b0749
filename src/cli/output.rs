//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::Rgb;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a key with its value (green key)
pub fn entry(key: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", key.green(), msg);
}

/// Print a color swatch followed by its label, using truecolor where supported
pub fn swatch(color: Rgb, msg: &(impl std::fmt::Display + ?Sized)) {
    println!(
        "{} {}",
        "  ".on_truecolor(color.r, color.g, color.b),
        msg
    );
}

/// Print plain output (no color, for data such as JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
