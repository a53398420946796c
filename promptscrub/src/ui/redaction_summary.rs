// promptscrub/src/ui/redaction_summary.rs
//! Human-readable summary of one sanitization call.
//!
//! Only labels, counts and lengths are printed; matched text never is.

use std::io::{self, Write};

use promptscrub_core::{FilterStats, RedactionEvent};

use crate::ui::output_format::write_styled;
use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes the per-label events followed by the before/after statistics.
pub fn print_summary<W: Write>(
    events: &[RedactionEvent],
    stats: &FilterStats,
    writer: &mut W,
    theme_map: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer)?;
    write_styled(writer, "Redaction Summary:", ThemeEntry::Header, theme_map, supports_color)?;
    writeln!(writer)?;

    if events.is_empty() {
        writeln!(writer, "  No redactions applied.")?;
    }
    for event in events {
        write!(writer, "  ")?;
        write_styled(writer, &event.label, ThemeEntry::SummaryRuleName, theme_map, supports_color)?;
        write!(writer, ": ")?;
        let occurrences = if event.count == 1 {
            "1 match".to_string()
        } else {
            format!("{} matches", event.count)
        };
        write_styled(writer, &occurrences, ThemeEntry::SummaryOccurrences, theme_map, supports_color)?;
        writeln!(writer, " ({} chars)", event.matched_span_length)?;
    }

    writeln!(
        writer,
        "  Length: {} -> {} chars ({}% reduction), {} item(s) filtered",
        stats.original_length, stats.filtered_length, stats.reduction_percentage, stats.items_filtered
    )
}
