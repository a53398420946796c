//! Module for managing the colours of promptscrub's terminal output.
//!
//! A theme maps each styled output element to an optional 16-colour ANSI
//! foreground. Themes are loaded from YAML; entries missing from a user file
//! fall back to the default palette.

use anyhow::{Context, Result};
use owo_colors::AnsiColors;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeEntry {
    /// Section titles such as the summary header.
    Header,
    Success,
    Info,
    Warn,
    Error,
    /// Lines added in a diff view.
    DiffAdded,
    /// Lines removed in a diff view.
    DiffRemoved,
    /// Hunk headers of a diff view.
    DiffHeader,
    /// Rule labels in summaries.
    SummaryRuleName,
    /// Counts in summaries.
    SummaryOccurrences,
}

impl ThemeEntry {
    pub const ALL: [ThemeEntry; 10] = [
        ThemeEntry::Header,
        ThemeEntry::Success,
        ThemeEntry::Info,
        ThemeEntry::Warn,
        ThemeEntry::Error,
        ThemeEntry::DiffAdded,
        ThemeEntry::DiffRemoved,
        ThemeEntry::DiffHeader,
        ThemeEntry::SummaryRuleName,
        ThemeEntry::SummaryOccurrences,
    ];

    fn default_color(self) -> &'static str {
        match self {
            ThemeEntry::Header | ThemeEntry::DiffHeader => "cyan",
            ThemeEntry::Success | ThemeEntry::DiffAdded => "green",
            ThemeEntry::Warn | ThemeEntry::SummaryOccurrences => "yellow",
            ThemeEntry::Error | ThemeEntry::DiffRemoved => "red",
            ThemeEntry::Info | ThemeEntry::SummaryRuleName => "white",
        }
    }
}

/// Represents an ANSI color that can be used in the theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ThemeColor {
    /// A named ANSI color (e.g., "red", "brightgreen").
    Named(String),
}

/// Error type for parsing an invalid `ThemeColor` string.
#[derive(Debug, Clone)]
pub struct ParseThemeColorError(String);

impl fmt::Display for ParseThemeColorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid theme color '{}'; expected a 16-color ANSI name such as red or brightgreen.",
            self.0
        )
    }
}

impl std::error::Error for ParseThemeColorError {}

impl FromStr for ThemeColor {
    type Err = ParseThemeColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if named_ansi(&lower).is_some() {
            Ok(ThemeColor::Named(lower))
        } else {
            Err(ParseThemeColorError(s.to_string()))
        }
    }
}

fn named_ansi(name: &str) -> Option<AnsiColors> {
    let color = match name {
        "black" => AnsiColors::Black,
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "yellow" => AnsiColors::Yellow,
        "blue" => AnsiColors::Blue,
        "magenta" => AnsiColors::Magenta,
        "cyan" => AnsiColors::Cyan,
        "white" => AnsiColors::White,
        "brightblack" => AnsiColors::BrightBlack,
        "brightred" => AnsiColors::BrightRed,
        "brightgreen" => AnsiColors::BrightGreen,
        "brightyellow" => AnsiColors::BrightYellow,
        "brightblue" => AnsiColors::BrightBlue,
        "brightmagenta" => AnsiColors::BrightMagenta,
        "brightcyan" => AnsiColors::BrightCyan,
        "brightwhite" => AnsiColors::BrightWhite,
        _ => return None,
    };
    Some(color)
}

impl ThemeColor {
    /// Converts the color into its `owo_colors::AnsiColors` value; unknown names render white.
    pub fn to_ansi_color(&self) -> AnsiColors {
        match self {
            ThemeColor::Named(name) => {
                named_ansi(&name.to_lowercase()).unwrap_or(AnsiColors::White)
            }
        }
    }
}

/// Represents the style configuration for a specific `ThemeEntry`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeStyle {
    pub fg: Option<ThemeColor>,
}

/// Loads a theme configuration from a YAML file or returns the default theme.
pub fn build_theme_map(theme_path: Option<&PathBuf>) -> Result<ThemeMap> {
    match theme_path {
        Some(path) => ThemeStyle::load_from_file(path),
        None => Ok(ThemeStyle::default_theme_map()),
    }
}

/// Returns the ANSI foreground configured for `entry`, if any.
pub fn entry_color(theme: &ThemeMap, entry: ThemeEntry) -> Option<AnsiColors> {
    theme
        .get(&entry)
        .and_then(|style| style.fg.as_ref())
        .map(ThemeColor::to_ansi_color)
}

impl ThemeStyle {
    /// Loads a theme from a YAML file and fills missing entries from the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ThemeMap> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        let mut custom: ThemeMap = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse theme file {}", path.display()))?;

        for (entry, style) in Self::default_theme_map() {
            custom.entry(entry).or_insert(style);
        }
        Ok(custom)
    }

    /// Returns a default theme map with predefined color mappings.
    pub fn default_theme_map() -> ThemeMap {
        ThemeEntry::ALL
            .iter()
            .map(|&entry| {
                let style = ThemeStyle {
                    fg: Some(ThemeColor::Named(entry.default_color().into())),
                };
                (entry, style)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_named_colors() {
        assert!("red".parse::<ThemeColor>().is_ok());
        assert!("BrightGreen".parse::<ThemeColor>().is_ok());
        assert!("unknown".parse::<ThemeColor>().is_err());
    }

    #[test]
    fn to_ansi_color_roundtrip() {
        let tc: ThemeColor = "blue".parse().unwrap();
        assert_eq!(tc.to_ansi_color(), AnsiColors::Blue);
        let tc: ThemeColor = "brightmagenta".parse().unwrap();
        assert_eq!(tc.to_ansi_color(), AnsiColors::BrightMagenta);
    }

    #[test]
    fn default_theme_covers_every_entry() {
        let theme = ThemeStyle::default_theme_map();
        assert_eq!(theme.len(), ThemeEntry::ALL.len());
        assert_eq!(entry_color(&theme, ThemeEntry::DiffRemoved), Some(AnsiColors::Red));
    }

    #[test]
    fn partial_theme_file_is_filled_from_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "diff_added:\n  fg: brightblue").unwrap();
        let theme = build_theme_map(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(entry_color(&theme, ThemeEntry::DiffAdded), Some(AnsiColors::BrightBlue));
        assert_eq!(entry_color(&theme, ThemeEntry::Error), Some(AnsiColors::Red));
    }
}
