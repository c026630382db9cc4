//! JSON export of search reports.
//!
//! # Output Structure
//!
//! Reports are grouped by the local date they were generated on:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── educacao.json
//!     └── meio-ambiente.json
//! ```
//!
//! A later search for the same topic on the same day overwrites the earlier
//! file.

use crate::models::SearchReport;
use crate::utils::slugify;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` to `{json_output_dir}/{date}/{slug}.json`.
///
/// The per-day directory is created when missing. An existing file for the
/// same topic and day is overwritten.
///
/// # Returns
///
/// The full path of the file written.
///
/// # Errors
///
/// Returns an error if serialization fails, the directory cannot be created,
/// or the file cannot be written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, keyword = %report.keyword))]
pub async fn write_report(
    report: &SearchReport,
    json_output_dir: &str,
    date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(date);
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(format!("{}.json", slugify(&report.keyword)));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Origin, VideoOutcome, YearCounts};

    #[tokio::test]
    async fn test_write_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let report = SearchReport {
            keyword: "Meio Ambiente".to_string(),
            generated_at: "2025-05-06T10:00:00-03:00".to_string(),
            variant: None,
            origin: Some(Origin::Camara),
            attempts: vec![],
            items: vec![],
            year_counts: YearCounts::empty(),
            videos: VideoOutcome::Disabled,
        };
        let base = dir.path().to_str().unwrap();
        let path = write_report(&report, base, "2025-05-06").await.unwrap();

        assert_eq!(path, dir.path().join("2025-05-06").join("meio-ambiente.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let back: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(back["keyword"], "Meio Ambiente");
        assert_eq!(back["origin"], "camara");
        assert_eq!(back["year_counts"]["2024"], 0);
        assert_eq!(back["videos"]["status"], "disabled");
    }
}
