//! Vertical text bar chart of the per-year tally.
//!
//! ```text
//! Tema: educação
//! 2 |         ██
//! 1 |   ██    ██
//!   +------------------------------------
//!     2020  2021  2022  2023  2024  2025
//!      0     1     2     0     0     0
//! ```

use crate::models::YearCounts;
use std::fmt::Write;

const CELL: usize = 6;
const BAR: &str = "  ██  ";
const GAP: &str = "      ";

/// Bar height in rows for `count`.
///
/// Counts map one-to-one onto rows until the tallest bar would exceed
/// `max_rows`; then every bar is scaled down, and a non-zero count keeps at
/// least one row.
pub fn bar_height(count: usize, max_count: usize, max_rows: usize) -> usize {
    if count == 0 || max_count == 0 || max_rows == 0 {
        return 0;
    }
    if max_count <= max_rows {
        return count;
    }
    (count * max_rows).div_ceil(max_count).max(1)
}

pub fn render(counts: &YearCounts, title: &str, max_rows: usize) -> String {
    let max_count = counts.max();
    let rows = bar_height(max_count, max_count, max_rows);
    let scaled = max_count > max_rows;
    let label_width = max_count.to_string().len();
    let heights: Vec<usize> = counts
        .iter()
        .map(|(_, n)| bar_height(n, max_count, max_rows))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    for level in (1..=rows).rev() {
        let label = if !scaled {
            level.to_string()
        } else if level == rows {
            max_count.to_string()
        } else {
            String::new()
        };
        let mut line = format!("{label:>label_width$} |");
        for h in &heights {
            line.push_str(if *h >= level { BAR } else { GAP });
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let indent = " ".repeat(label_width);
    let _ = writeln!(out, "{indent} +{}", "-".repeat(CELL * heights.len()));
    let years: String = counts.years().map(|y| format!("{y:^CELL$}")).collect();
    let _ = writeln!(out, "{indent}  {}", years.trim_end());
    let totals: String = counts.iter().map(|(_, n)| format!("{n:^CELL$}")).collect();
    let _ = writeln!(out, "{indent}  {}", totals.trim_end());
    out
}
