//! Plain-text rendering of week layouts, used by the command line front end.

use std::fmt::Write;

use chrono::Datelike;

use crate::grid::DAYS_PER_WEEK;
use crate::layout::{PositionedEvent, WeekLayout};

/// Characters per day column
pub const CELL_WIDTH: usize = 12;

/// Render one week: a header with day numbers, one line per stacking row and
/// a final "+N more" line if any column overflowed.
///
/// Bars are drawn as `[title]`; an edge that continues into the neighbouring
/// week is drawn as `<` or `>` instead of a bracket, and a preview bar uses
/// `=` as fill.
pub fn render_week(layout: &WeekLayout<'_>) -> String {
    let mut out = String::new();

    for day in &layout.week {
        let _ = write!(out, "{:<width$}", format!(" {:>2} {}", day.day(), day.weekday()), width = CELL_WIDTH);
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    for row in 0..layout.row_count() {
        let mut line = vec![' '; CELL_WIDTH * DAYS_PER_WEEK];
        for positioned in layout.row(row) {
            draw_bar(&mut line, positioned);
        }
        let text: String = line.into_iter().collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }

    if layout.has_overflow() {
        let mut line = String::new();
        for column in 0..DAYS_PER_WEEK {
            let cell = match layout.more_count(column) {
                0 => String::new(),
                hidden => format!("+{} more", hidden),
            };
            let _ = write!(line, "{:<width$}", cell, width = CELL_WIDTH);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn draw_bar(line: &mut [char], positioned: &PositionedEvent<'_>) {
    let from = positioned.start_column * CELL_WIDTH;
    let to = (positioned.end_column + 1) * CELL_WIDTH - 1;
    let fill = if positioned.is_preview { '=' } else { ' ' };

    for cell in &mut line[from..to] {
        *cell = fill;
    }
    line[from] = if positioned.continues_from_previous { '<' } else { '[' };
    line[to - 1] = if positioned.continues_to_next { '>' } else { ']' };

    let room = (to - 1).saturating_sub(from + 1);
    for (cell, ch) in line[from + 1..].iter_mut().zip(positioned.event.title.chars().take(room)) {
        *cell = ch;
    }
}
