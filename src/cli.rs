//! Command-line interface definitions.
//!
//! Every credential can come from a flag or from the environment (a `.env`
//! file in the working directory is loaded first). Nothing is ever read from
//! source code.

use crate::outputs::table::SortKey;
use clap::Parser;

/// Search Brazilian legislative and judicial open data by topic.
///
/// # Examples
///
/// ```sh
/// # One-off search
/// tema_legislativo "inteligência artificial"
///
/// # Interactive prompt, newest items first, with report files
/// tema_legislativo --sort year --desc -j ./json -m ./markdown
///
/// # Include STF decisions (BigQuery billing project + OAuth token)
/// STF_BILLING_PROJECT=my-project GCP_ACCESS_TOKEN=$(gcloud auth print-access-token) \
///     tema_legislativo "meio ambiente"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search; omit to start the interactive prompt
    pub keyword: Option<String>,

    /// Column to sort the table by
    #[arg(long, value_enum, default_value_t = SortKey::Year)]
    pub sort: SortKey,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Output directory for JSON reports
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for Markdown reports and the search index
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// YouTube Data API key; without it video recommendations are disabled
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Number of videos to recommend (overrides the settings file)
    #[arg(long)]
    pub max_videos: Option<u32>,

    /// Skip the video lookup entirely
    #[arg(long)]
    pub no_videos: bool,

    /// Google Cloud project billed for STF warehouse queries; enables the STF source
    #[arg(long, env = "STF_BILLING_PROJECT")]
    pub billing_project: Option<String>,

    /// OAuth access token for BigQuery
    #[arg(long, env = "GCP_ACCESS_TOKEN", hide_env_values = true)]
    pub gcp_access_token: Option<String>,

    /// Per-call network deadline in seconds (overrides the settings file)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
