//! Text table of search results.

use crate::models::LegislativeItem;
use crate::utils::truncate_chars;
use clap::ValueEnum;
use std::cmp::Ordering;
use std::fmt::Write;

/// Column the table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    Year,
    Kind,
    Number,
    Origin,
}

const HEADERS: [&str; 6] = ["Ano", "Tipo", "Número", "Origem", "Ementa", "URL"];

/// Sort items in place. Missing values sort last in either direction.
pub fn sort_items(items: &mut [LegislativeItem], key: SortKey, descending: bool) {
    items.sort_by(|a, b| {
        let ord = match key {
            SortKey::Year => cmp_missing_last(a.year, b.year, descending),
            SortKey::Kind => cmp_missing_last(a.kind.as_deref(), b.kind.as_deref(), descending),
            SortKey::Number => cmp_missing_last(
                a.number.as_deref().map(number_key),
                b.number.as_deref().map(number_key),
                descending,
            ),
            SortKey::Origin => directed(a.origin.cmp(&b.origin), descending),
        };
        // Stable secondary order so ties render predictably.
        ord.then_with(|| cmp_missing_last(a.year, b.year, false))
    });
}

fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending { ord.reverse() } else { ord }
}

fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => directed(x.cmp(&y), descending),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numbers like `"00123"` should sort as 123; non-numeric ones after all
/// numeric ones, alphabetically.
fn number_key(s: &str) -> (u64, String) {
    match s.trim().parse::<u64>() {
        Ok(n) => (n, String::new()),
        Err(_) => (u64::MAX, s.to_string()),
    }
}

/// Render `items` (already sorted) as a fixed-width text table.
pub fn render(items: &[LegislativeItem], summary_width: usize) -> String {
    let rows: Vec<[String; 6]> = items
        .iter()
        .map(|i| {
            [
                i.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
                i.kind.clone().unwrap_or_else(|| "-".to_string()),
                i.number.clone().unwrap_or_else(|| "-".to_string()),
                i.origin.label().to_string(),
                truncate_chars(&i.summary.replace('\n', " "), summary_width),
                i.url.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, HEADERS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, w)| {
            let pad = w.saturating_sub(c.chars().count());
            format!("{c}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
