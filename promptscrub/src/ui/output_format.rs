//! Themed one-line status messages.
//!
//! Messages go to the writer they are given (stderr in practice) so that
//! stdout only ever carries sanitized output or JSON.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::ui::theme::{entry_color, ThemeEntry, ThemeMap};

/// Writes `text` in the colour configured for `entry` when `supports_color` is set.
pub fn write_styled<W: Write>(
    writer: &mut W,
    text: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    match entry_color(theme, entry) {
        Some(color) if supports_color => write!(writer, "{}", text.color(color)),
        _ => write!(writer, "{}", text),
    }
}

fn print_message<W: Write>(
    writer: &mut W,
    prefix: &str,
    msg: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    write_styled(writer, &format!("{prefix}{msg}"), entry, theme, supports_color)?;
    writeln!(writer)
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", msg, ThemeEntry::Info, theme, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", msg, ThemeEntry::Success, theme, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Warning: ", msg, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Error: ", msg, ThemeEntry::Error, theme, supports_color)
}
