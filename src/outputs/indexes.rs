//! Markdown index of past searches.
//!
//! `index.md` lists every Markdown report written to the output directory,
//! grouped under one heading per date:
//!
//! ```text
//! # Pesquisas
//!
//! - **2025-05-06**
//!     - [educação](./2025-05-06_educacao.md) (3 itens)
//!     - [meio ambiente](./2025-05-06_meio-ambiente.md) (0 itens)
//! ```
//!
//! Repeating a search on the same day replaces its entry instead of adding a
//! second one.

use crate::models::SearchReport;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const HEADER: &str = "# Pesquisas";

/// Add or refresh the entry for this search in `index.md`.
///
/// Entries are grouped under one `## {date}` heading per day, newest day
/// first. Searching the same topic again on the same day replaces its line.
///
/// # Arguments
///
/// * `markdown_output_dir` - Directory holding the Markdown reports
/// * `report` - The report that was just written
/// * `date` - Local date of the search (`YYYY-MM-DD`)
/// * `markdown_filename` - File name returned by [`super::markdown::write_report`]
///
/// # Errors
///
/// Returns an error if the existing index cannot be read or the updated one
/// cannot be written.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, %date, file = %markdown_filename))]
pub async fn update_search_index(
    markdown_output_dir: &str,
    report: &SearchReport,
    date: &str,
    markdown_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let index_path = Path::new(markdown_output_dir).join("index.md");
    let content = if index_path.exists() {
        fs::read_to_string(&index_path).await?
    } else {
        format!("{HEADER}\n")
    };

    let updated = insert_entry(&content, report, date, markdown_filename);
    fs::write(&index_path, updated).await?;
    info!(path = %index_path.display(), "Updated search index");
    Ok(())
}

/// Pure part of [`update_search_index`], kept separate for testing.
fn insert_entry(content: &str, report: &SearchReport, date: &str, markdown_filename: &str) -> String {
    let date_heading = format!("- **{date}**");
    let link = format!("](./{markdown_filename})");
    let entry = format!(
        "    - [{}](./{}) ({} itens)",
        report.keyword,
        markdown_filename,
        report.items.len()
    );

    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

    if let Some(i) = lines.iter().position(|l| l.trim() == date_heading) {
        let mut j = i + 1;
        while j < lines.len() && lines[j].starts_with("    - ") {
            if lines[j].contains(&link) {
                lines[j] = entry;
                return lines.join("\n") + "\n";
            }
            j += 1;
        }
        lines.insert(j, entry);
    } else {
        let insert_at = lines
            .iter()
            .position(|l| l.starts_with(HEADER))
            .map(|p| p + 1)
            .unwrap_or(lines.len());
        // Newest date first, right under the header.
        lines.insert(insert_at, String::new());
        lines.insert(insert_at + 1, date_heading);
        lines.insert(insert_at + 2, entry);
    }

    lines.join("\n") + "\n"
}
