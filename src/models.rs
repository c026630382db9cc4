//! Data models for search results and reports.
//!
//! This module defines the records that live for the duration of one search:
//! - [`LegislativeItem`]: one bill, proposal or decision returned by a source
//! - [`YearCounts`]: the per-year tally over the fixed 2020–2025 window
//! - [`VideoLink`] / [`VideoOutcome`]: recommended videos for the topic
//! - [`SearchReport`]: everything above bundled for rendering and export

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// First year of the tally window (inclusive).
pub const FIRST_YEAR: i32 = 2020;
/// Last year of the tally window (inclusive).
pub const LAST_YEAR: i32 = 2025;

/// Which body's endpoint produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Senado,
    Camara,
    Stf,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Origin::Senado => "Senado",
            Origin::Camara => "Câmara",
            Origin::Stf => "STF",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single legislative or judicial record.
///
/// Every field except `summary`, `url` and `origin` may be missing from the
/// upstream payload, so they are kept optional rather than defaulted to
/// sentinel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegislativeItem {
    /// Year the item was filed.
    pub year: Option<i32>,
    /// Type or subtype code (`PL`, `PEC`, `ADI`, ...).
    pub kind: Option<String>,
    /// Number within its type and year.
    pub number: Option<String>,
    /// Summary text ("ementa").
    pub summary: String,
    /// Canonical web or resource URL.
    pub url: String,
    pub origin: Origin,
}

/// Per-year item counts over `FIRST_YEAR..=LAST_YEAR`.
///
/// The key set is fixed at construction; [`YearCounts::record`] ignores years
/// outside the window instead of growing the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCounts(BTreeMap<i32, usize>);

impl YearCounts {
    /// All six years present, every count zero.
    pub fn empty() -> Self {
        Self((FIRST_YEAR..=LAST_YEAR).map(|y| (y, 0)).collect())
    }

    /// Count one item for `year`. Returns `false` when the year is outside
    /// the window and nothing was counted.
    pub fn record(&mut self, year: i32) -> bool {
        match self.0.get_mut(&year) {
            Some(n) => {
                *n += 1;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn get(&self, year: i32) -> Option<usize> {
        self.0.get(&year).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.0.iter().map(|(y, n)| (*y, *n))
    }

    pub fn max(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }
}

impl Default for YearCounts {
    fn default() -> Self {
        Self::empty()
    }
}

/// A recommended video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    pub title: String,
    pub url: String,
}

/// Result of the video lookup. Never an error from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "videos", rename_all = "lowercase")]
pub enum VideoOutcome {
    /// No API key configured, or lookup switched off.
    Disabled,
    Found(Vec<VideoLink>),
    Empty,
    /// The lookup failed; the message is kept for the report only.
    Failed(String),
}

impl VideoOutcome {
    pub fn links(&self) -> &[VideoLink] {
        match self {
            VideoOutcome::Found(v) => v,
            _ => &[],
        }
    }
}

/// What a single (source, variant) call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Hits(usize),
    Empty,
    Failed(String),
}

/// One entry of the fallback trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub source: String,
    pub variant: String,
    pub outcome: AttemptOutcome,
}

/// Everything produced by one successful search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Keyword as typed by the user (trimmed).
    pub keyword: String,
    /// RFC 3339 local timestamp.
    pub generated_at: String,
    /// Variant that produced the items.
    pub variant: Option<String>,
    /// Source that produced the items.
    pub origin: Option<Origin>,
    pub attempts: Vec<Attempt>,
    pub items: Vec<LegislativeItem>,
    pub year_counts: YearCounts,
    pub videos: VideoOutcome,
}
