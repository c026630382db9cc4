//! One request through the pipeline: keyword in, dashboard state out.
//!
//! 1. **Guard**: a blank keyword stops here with a warning, no calls made
//! 2. **Search**: sequential fallback across sources and keyword variants
//! 3. **Aggregate**: per-year tally over 2020–2025
//! 4. **Videos**: best-effort recommendations, isolated from the results
//!
//! Everything runs in order on the caller's task. The only state shared
//! between requests is the immutable source list and HTTP client.

use crate::aggregate::count_by_year;
use crate::config::Settings;
use crate::keywords::is_blank;
use crate::models::{Attempt, SearchReport, VideoOutcome};
use crate::outputs::table::{self, SortKey};
use crate::outputs::{chart, markdown};
use crate::search::search_with_fallback;
use crate::sources::camara::CamaraSource;
use crate::sources::senado::SenadoSource;
use crate::sources::stf::StfSource;
use crate::sources::ItemSource;
use crate::videos::{VideoSearch, YoutubeClient};
use chrono::{Local, SecondsFormat};
use reqwest::Client;
use std::fmt::Write;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub const EMPTY_KEYWORD: &str = "Por favor, insira um tema para continuar.";
pub const NOTHING_FOUND: &str = "Nenhuma matéria encontrada.";

/// What the user sees after one trigger.
#[derive(Debug, Clone)]
pub enum DashboardState {
    /// Blank input; nothing was queried.
    Warning(String),
    /// Every source and variant came back empty or failed.
    NotFound { keyword: String, attempts: Vec<Attempt> },
    Found(SearchReport),
}

/// Credentials and switches that come from the command line or environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub youtube_api_key: Option<String>,
    pub billing_project: Option<String>,
    pub gcp_access_token: Option<String>,
    pub videos_enabled: bool,
}

pub struct Dashboard {
    sources: Vec<Box<dyn ItemSource>>,
    videos: Box<dyn VideoSearch>,
}

impl Dashboard {
    pub fn new(sources: Vec<Box<dyn ItemSource>>, videos: Box<dyn VideoSearch>) -> Self {
        Self { sources, videos }
    }

    /// Wire the production sources: Senado, then Câmara, then STF when a
    /// billing project and token are both present.
    pub fn from_settings(settings: &Settings, client: Client, creds: Credentials) -> Self {
        let mut sources: Vec<Box<dyn ItemSource>> = Vec::with_capacity(3);
        sources.push(Box::new(SenadoSource::new(
            client.clone(),
            settings.senado_base.clone(),
        )));
        sources.push(Box::new(CamaraSource::new(
            client.clone(),
            settings.camara_base.clone(),
            settings.page_size,
        )));

        match (non_blank(creds.billing_project), non_blank(creds.gcp_access_token)) {
            (Some(project), Some(token)) => {
                info!(%project, "STF decisions source enabled");
                sources.push(Box::new(StfSource::new(
                    client.clone(),
                    settings.stf.bigquery_base.clone(),
                    project,
                    token,
                    settings.stf.table.clone(),
                    settings.page_size,
                    settings.timeout_secs.saturating_mul(1000),
                )));
            }
            (Some(project), None) => {
                warn!(%project, "Billing project set but no GCP access token; STF source skipped");
            }
            _ => {}
        }

        let key = if creds.videos_enabled {
            creds.youtube_api_key
        } else {
            None
        };
        let videos = YoutubeClient::new(client, key, settings.youtube.clone());
        info!(enabled = videos.is_enabled(), "Video recommendations");

        Self::new(sources, Box::new(videos))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, keyword: &str) -> DashboardState {
        if is_blank(keyword) {
            warn!("Empty keyword submitted");
            return DashboardState::Warning(EMPTY_KEYWORD.to_string());
        }
        let keyword = keyword.trim();
        let t0 = Instant::now();

        let outcome = search_with_fallback(&self.sources, keyword).await;
        if outcome.is_empty() {
            info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Nothing found");
            return DashboardState::NotFound {
                keyword: keyword.to_string(),
                attempts: outcome.attempts,
            };
        }

        let year_counts = count_by_year(&outcome.items);
        let videos = self.videos.recommend(keyword).await;

        info!(
            items = outcome.items.len(),
            counted = year_counts.total(),
            videos = videos.links().len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Request complete"
        );

        DashboardState::Found(SearchReport {
            keyword: keyword.to_string(),
            generated_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            variant: outcome.variant,
            origin: outcome.origin,
            attempts: outcome.attempts,
            items: outcome.items,
            year_counts,
            videos,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// How the terminal view is laid out.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub sort: SortKey,
    pub descending: bool,
    pub chart_height: usize,
    pub summary_width: usize,
}

impl DashboardState {
    /// Terminal rendering: status line, table, chart, video list.
    pub fn to_terminal(&self, view: &ViewOptions) -> String {
        let mut out = String::new();
        match self {
            DashboardState::Warning(msg) => {
                let _ = writeln!(out, "⚠ {msg}");
            }
            DashboardState::NotFound { keyword, attempts } => {
                let _ = writeln!(out, "🔎 {keyword}");
                let _ = writeln!(out, "✗ {NOTHING_FOUND} ({} tentativas)", attempts.len());
            }
            DashboardState::Found(report) => {
                let origin = report.origin.map(|o| o.label()).unwrap_or("-");
                let _ = writeln!(
                    out,
                    "✓ {} matérias encontradas ({origin}, termo: {})\n",
                    report.items.len(),
                    report.variant.as_deref().unwrap_or(&report.keyword),
                );

                let mut items = report.items.clone();
                table::sort_items(&mut items, view.sort, view.descending);
                out.push_str(&table::render(&items, view.summary_width));
                out.push('\n');

                out.push_str(&chart::render(
                    &report.year_counts,
                    &format!("Tema: {}", report.keyword),
                    view.chart_height,
                ));
                out.push('\n');

                let _ = writeln!(out, "Vídeos recomendados");
                match &report.videos {
                    VideoOutcome::Found(links) => {
                        for v in links {
                            let _ = writeln!(out, "- {} <{}>", v.title, v.url);
                        }
                    }
                    _ => {
                        let _ = writeln!(out, "ℹ {}", markdown::NO_VIDEOS);
                    }
                }
            }
        }
        out
    }
}
