//! # Tema Legislativo
//!
//! A terminal dashboard for Brazilian legislative and judicial open data.
//! Given a topic, it searches the Senado Federal, falls back to the Câmara dos
//! Deputados (and optionally STF decisions), tallies results per year for
//! 2020–2025, and recommends related YouTube videos.
//!
//! ## Usage
//!
//! ```sh
//! tema_legislativo "educação"
//! tema_legislativo -j ./json -m ./markdown   # interactive prompt
//! ```
//!
//! ## Architecture
//!
//! Each request is a short sequential pipeline:
//! 1. **Search**: try each source with each keyword spelling until one answers
//! 2. **Aggregate**: count items per year
//! 3. **Videos**: best-effort lookup, disabled without an API key
//! 4. **Output**: terminal table and chart, optional JSON and Markdown reports

use clap::Parser;
use std::error::Error;
use std::io::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod dashboard;
mod error;
mod keywords;
mod models;
mod outputs;
mod search;
mod sources;
mod utils;
mod videos;

use cli::Cli;
use config::Settings;
use dashboard::{Credentials, Dashboard, DashboardState, ViewOptions};
use outputs::{indexes, json, markdown};
use utils::{ensure_writable_dir, local_date};

const QUIT: &str = ":q";

/// Where and how results are written after each request.
struct Session {
    dashboard: Dashboard,
    view: ViewOptions,
    json_output_dir: Option<String>,
    markdown_output_dir: Option<String>,
}

impl Session {
    async fn handle(&self, keyword: &str) {
        let state = self.dashboard.run(keyword).await;
        print!("{}", state.to_terminal(&self.view));
        let _ = std::io::stdout().flush();

        if let DashboardState::Found(report) = &state {
            let date = local_date();

            if let Some(dir) = &self.json_output_dir {
                if let Err(e) = json::write_report(report, dir, &date).await {
                    error!(error = %e, "Failed to write JSON report");
                }
            }

            if let Some(dir) = &self.markdown_output_dir {
                match markdown::write_report(
                    report,
                    dir,
                    &date,
                    self.view.chart_height,
                    self.view.summary_width,
                )
                .await
                {
                    Ok(filename) => {
                        if let Err(e) =
                            indexes::update_search_index(dir, report, &date, &filename).await
                        {
                            error!(error = %e, "Failed to update search index");
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to write Markdown report"),
                }
            }
        }
    }

    /// Read topics from `input` until EOF or `:q`.
    ///
    /// Every line is its own request; a line that is not valid UTF-8 is
    /// decoded lossily and handled like any other input.
    ///
    /// # Errors
    ///
    /// Returns an error only when reading `input` or flushing stdout fails.
    async fn interactive<R>(&self, mut input: R) -> Result<(), Box<dyn Error>>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            print!("Tema> ");
            std::io::stdout().flush()?;
            let Some(line) = next_line(&mut input).await? else {
                println!();
                break;
            };
            if line.trim() == QUIT {
                break;
            }
            self.handle(&line).await;
            println!();
        }
        Ok(())
    }
}

/// One line from `input` without its line ending, or `None` at EOF.
async fn next_line<R>(input: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if std::str::from_utf8(&buf).is_err() {
        warn!(bytes = buf.len(), "Input line is not valid UTF-8; decoding lossily");
    }
    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing init (stderr, so stdout stays the dashboard) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, sort = ?args.sort, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(t) = args.timeout_secs {
        settings.timeout_secs = t;
    }
    if let Some(n) = args.max_videos {
        settings.youtube.max_results = n;
    }
    settings.validate()?;

    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable (fix perms or choose a different path)");
            return Err(e);
        }
    }

    let client = sources::http_client(Duration::from_secs(settings.timeout_secs))?;
    let creds = Credentials {
        youtube_api_key: args.youtube_api_key.clone(),
        billing_project: args.billing_project.clone(),
        gcp_access_token: args.gcp_access_token.clone(),
        videos_enabled: !args.no_videos,
    };
    let dashboard = Dashboard::from_settings(&settings, client, creds);
    info!(sources = ?dashboard.source_names(), timeout_secs = settings.timeout_secs, "Dashboard ready");

    let session = Session {
        dashboard,
        view: ViewOptions {
            sort: args.sort,
            descending: args.desc,
            chart_height: settings.render.chart_height,
            summary_width: settings.render.summary_width,
        },
        json_output_dir: args.json_output_dir.clone(),
        markdown_output_dir: args.markdown_output_dir.clone(),
    };

    match args.keyword.as_deref() {
        Some(keyword) => session.handle(keyword).await,
        None => session.interactive(BufReader::new(tokio::io::stdin())).await?,
    }

    Ok(())
}
