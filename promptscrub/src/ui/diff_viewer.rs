// promptscrub/src/ui/diff_viewer.rs
//! Line diff between the raw input and the sanitized text.
//!
//! Sanitization collapses whitespace, so the cleaned text is usually a single
//! line while the input may span several.

use diffy::{create_patch, Line as DiffLine};
use std::io::{self, Write};

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes a `-`/`+` line diff of `original` against `sanitized`.
pub fn print_diff<W: Write>(
    original: &str,
    sanitized: &str,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let patch = create_patch(original, sanitized);

    write_styled(writer, "--- Diff View ---", ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)?;

    let mut changed = false;
    for hunk in patch.hunks() {
        for line_change in hunk.lines() {
            match line_change {
                DiffLine::Delete(s) => {
                    changed = true;
                    write_styled(writer, &format!("- {}", s.trim_end_matches('\n')), ThemeEntry::DiffRemoved, theme_map, supports_color)?;
                    writeln!(writer)?;
                }
                DiffLine::Insert(s) => {
                    changed = true;
                    write_styled(writer, &format!("+ {}", s.trim_end_matches('\n')), ThemeEntry::DiffAdded, theme_map, supports_color)?;
                    writeln!(writer)?;
                }
                DiffLine::Context(s) => {
                    writeln!(writer, "  {}", s.trim_end_matches('\n'))?;
                }
            }
        }
    }

    if !changed {
        writeln!(writer, "No changes detected.")?;
    }
    write_styled(writer, "-----------------", ThemeEntry::DiffHeader, theme_map, supports_color)?;
    writeln!(writer)
}
