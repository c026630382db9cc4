//! Markdown rendering of a [`SearchReport`].

use crate::models::{SearchReport, VideoOutcome};
use crate::outputs::chart;
use crate::utils::{slugify, truncate_chars};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Message shown when no video could be listed.
pub const NO_VIDEOS: &str =
    "Nenhum vídeo encontrado ou chave da API do YouTube não configurada.";

/// Write the report to `{markdown_output_dir}/{date}_{slug}.md`.
///
/// # Arguments
///
/// * `report` - Results, tally and videos of one search
/// * `markdown_output_dir` - Existing directory for the report
/// * `date` - Local date used as the file name prefix
/// * `chart_height` - Rows of the embedded bar chart
/// * `summary_width` - Characters kept from each summary
///
/// # Returns
///
/// The file name without its directory, ready for
/// [`super::indexes::update_search_index`].
///
/// # Errors
///
/// Returns an error if the file cannot be written.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir, keyword = %report.keyword))]
pub async fn write_report(
    report: &SearchReport,
    markdown_output_dir: &str,
    date: &str,
    chart_height: usize,
    summary_width: usize,
) -> Result<String, Box<dyn Error>> {
    let filename = format!("{}_{}.md", date, slugify(&report.keyword));
    let path = Path::new(markdown_output_dir).join(&filename);
    let md = report_to_markdown(report, chart_height, summary_width);
    fs::write(&path, md).await?;
    info!(path = %path.display(), "Wrote Markdown report");
    Ok(filename)
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

pub fn report_to_markdown(report: &SearchReport, chart_height: usize, summary_width: usize) -> String {
    let mut md = String::new();

    writeln!(md, "# Tema: {}\n", report.keyword).unwrap();
    writeln!(md, "_Gerado em {}_\n", report.generated_at).unwrap();

    let origin = report.origin.map(|o| o.label()).unwrap_or("-");
    let variant = report.variant.as_deref().unwrap_or("-");
    writeln!(
        md,
        "**{}** itens encontrados (fonte: {}, termo: `{}`).\n",
        report.items.len(),
        origin,
        variant
    )
    .unwrap();

    writeln!(md, "## Itens\n").unwrap();
    writeln!(md, "| Ano | Tipo | Número | Origem | Ementa | URL |").unwrap();
    writeln!(md, "|-----|------|--------|--------|--------|-----|").unwrap();
    for item in &report.items {
        writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} |",
            item.year.map(|y| y.to_string()).unwrap_or_default(),
            escape_cell(item.kind.as_deref().unwrap_or("")),
            escape_cell(item.number.as_deref().unwrap_or("")),
            item.origin.label(),
            escape_cell(&truncate_chars(&item.summary, summary_width)),
            if item.url.is_empty() {
                String::new()
            } else {
                format!("[link]({})", item.url)
            },
        )
        .unwrap();
    }

    writeln!(md, "\n## Itens por ano\n").unwrap();
    writeln!(md, "```text").unwrap();
    md.push_str(&chart::render(
        &report.year_counts,
        &format!("Tema: {}", report.keyword),
        chart_height,
    ));
    writeln!(md, "```\n").unwrap();

    writeln!(md, "## Vídeos recomendados\n").unwrap();
    match &report.videos {
        VideoOutcome::Found(links) => {
            for v in links {
                writeln!(md, "- [{}]({})", v.title.replace(']', "\\]"), v.url).unwrap();
            }
        }
        _ => {
            writeln!(md, "{NO_VIDEOS}").unwrap();
        }
    }

    if !report.attempts.is_empty() {
        writeln!(md, "\n<details><summary>Tentativas</summary>\n").unwrap();
        for a in &report.attempts {
            writeln!(md, "- `{}` / `{}`: {:?}", a.source, a.variant, a.outcome).unwrap();
        }
        writeln!(md, "\n</details>").unwrap();
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::count_by_year;
    use crate::models::{Attempt, AttemptOutcome, Origin, VideoLink};
    use crate::sources::fakes::item;

    fn report(videos: VideoOutcome) -> SearchReport {
        let items = vec![
            item(Origin::Senado, Some(2021), "1"),
            item(Origin::Senado, Some(2022), "2"),
            item(Origin::Senado, Some(2022), "3"),
        ];
        SearchReport {
            keyword: "educação".to_string(),
            generated_at: "2025-05-06T20:30:00-03:00".to_string(),
            variant: Some("educação".to_string()),
            origin: Some(Origin::Senado),
            attempts: vec![Attempt {
                source: "senado".to_string(),
                variant: "educação".to_string(),
                outcome: AttemptOutcome::Hits(3),
            }],
            year_counts: count_by_year(&items),
            items,
            videos,
        }
    }

    #[test]
    fn test_markdown_contains_table_chart_and_videos() {
        let md = report_to_markdown(
            &report(VideoOutcome::Found(vec![VideoLink {
                title: "Sessão [ao vivo]".to_string(),
                url: "https://www.youtube.com/watch?v=abc".to_string(),
            }])),
            10,
            60,
        );
        assert!(md.starts_with("# Tema: educação"));
        assert!(md.contains("**3** itens encontrados (fonte: Senado"));
        assert_eq!(md.matches("| Senado |").count(), 3);
        assert!(md.contains("```text\nTema: educação"));
        assert!(md.contains("- [Sessão [ao vivo\\]](https://www.youtube.com/watch?v=abc)"));
        assert!(md.contains("Tentativas"));
    }

    #[test]
    fn test_markdown_video_empty_state() {
        let md = report_to_markdown(&report(VideoOutcome::Disabled), 10, 60);
        assert!(md.contains(NO_VIDEOS));
    }

    #[tokio::test]
    async fn test_write_report_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_str().unwrap();
        let name = write_report(&report(VideoOutcome::Empty), base, "2025-05-06", 10, 60)
            .await
            .unwrap();
        assert_eq!(name, "2025-05-06_educacao.md");
        let written = std::fs::read_to_string(dir.path().join(&name)).unwrap();
        assert!(written.contains(NO_VIDEOS));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }
}
