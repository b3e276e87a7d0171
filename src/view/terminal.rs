use std::str::FromStr;

use owo_colors::{colors::css, OwoColorize, Stream};

use crate::domain::{Status, UnknownVariant};

const DEFAULT_WIDTH: u16 = 60;
const MAX_RULE_WIDTH: u16 = 72;

/// Whether to colour output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Colour when stdout supports it.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl FromStr for ColorChoice {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(UnknownVariant::new("color choice", s, "auto, always, never")),
        }
    }
}

/// Overrides colour detection for the rest of the process.
pub fn set_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Detects terminal width, returning None if not available
#[must_use]
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// A horizontal separator sized to the terminal.
#[must_use]
pub fn separator() -> String {
    let width = terminal_width().unwrap_or(DEFAULT_WIDTH).min(MAX_RULE_WIDTH);
    "─".repeat(usize::from(width))
}

/// Extension trait for colorizing output
///
/// Colour is applied only when stdout supports it, or when forced with
/// [`set_color_choice`].
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Embolden the text
    fn heading(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.fg::<css::Green>())
            .to_string()
    }

    fn warning(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.fg::<css::Orange>())
            .to_string()
    }

    fn info(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.fg::<css::LightBlue>())
            .to_string()
    }

    fn dim(&self) -> String {
        self.if_supports_color(Stream::Stdout, OwoColorize::dimmed)
            .to_string()
    }

    fn heading(&self) -> String {
        self.if_supports_color(Stream::Stdout, OwoColorize::bold)
            .to_string()
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn heading(&self) -> String {
        self.as_str().heading()
    }
}

/// A bracketed badge, e.g. `[fuzzy]`.
#[must_use]
pub fn badge(label: &str) -> String {
    format!("[{label}]").info()
}

/// The status badge: green when active, dimmed when inactive.
#[must_use]
pub fn status_badge(status: Status) -> String {
    let label = format!("[{status}]");
    match status {
        Status::Active => label.success(),
        Status::Inactive => label.dim(),
    }
}
