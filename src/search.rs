//! Sequential fallback search across sources and keyword variants.
//!
//! Sources are tried in order; within a source, keyword variants are tried in
//! order. The first call that returns at least one item ends the search.
//! Failures are logged and treated exactly like an empty answer: no backoff,
//! no second try of the same spelling.

use crate::keywords::variants;
use crate::models::{Attempt, AttemptOutcome, LegislativeItem, Origin};
use crate::sources::ItemSource;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of [`search_with_fallback`].
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub items: Vec<LegislativeItem>,
    /// Source that produced `items`, if any did.
    pub origin: Option<Origin>,
    /// Spelling that produced `items`, if any did.
    pub variant: Option<String>,
    /// Every call made, in order.
    pub attempts: Vec<Attempt>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Try every source with every keyword variant until one returns items.
///
/// # Arguments
///
/// * `sources` - Sources in priority order
/// * `keyword` - Raw user input; blank input makes no calls
///
/// # Returns
///
/// The first non-empty answer together with the source and spelling that
/// produced it. When nothing is found `items` is empty and `attempts` lists
/// every call made. Source errors never escape: each one is logged and
/// recorded as [`AttemptOutcome::Failed`].
#[instrument(level = "info", skip(sources), fields(sources = sources.len()))]
pub async fn search_with_fallback(
    sources: &[Box<dyn ItemSource>],
    keyword: &str,
) -> SearchOutcome {
    let t0 = Instant::now();
    let spellings = variants(keyword);
    let mut outcome = SearchOutcome::default();

    if spellings.is_empty() {
        debug!("Blank keyword; nothing to search");
        return outcome;
    }

    for source in sources {
        let tried: &[String] = if source.single_variant() {
            &spellings[..1]
        } else {
            &spellings
        };

        for variant in tried {
            let result = source.search(variant).await;
            let attempt_outcome = match result {
                Ok(items) if !items.is_empty() => {
                    info!(
                        source = source.name(),
                        %variant,
                        count = items.len(),
                        elapsed_ms = t0.elapsed().as_millis() as u64,
                        "Search produced results"
                    );
                    outcome.attempts.push(Attempt {
                        source: source.name().to_string(),
                        variant: variant.clone(),
                        outcome: AttemptOutcome::Hits(items.len()),
                    });
                    outcome.items = items;
                    outcome.origin = Some(source.origin());
                    outcome.variant = Some(variant.clone());
                    return outcome;
                }
                Ok(_) => {
                    debug!(source = source.name(), %variant, "No results");
                    AttemptOutcome::Empty
                }
                Err(e) => {
                    warn!(source = source.name(), %variant, error = %e, "Search attempt failed; trying next");
                    AttemptOutcome::Failed(e.to_string())
                }
            };
            outcome.attempts.push(Attempt {
                source: source.name().to_string(),
                variant: variant.clone(),
                outcome: attempt_outcome,
            });
        }
        info!(source = source.name(), "Source exhausted without results");
    }

    info!(
        attempts = outcome.attempts.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "No source returned results"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::fakes::{FakeSource, item};
    use std::sync::Arc;

    /// Lets a test keep a handle on a fake after boxing it for the search.
    struct Shared(Arc<FakeSource>);

    #[async_trait::async_trait]
    impl ItemSource for Shared {
        fn origin(&self) -> Origin {
            self.0.origin()
        }
        fn name(&self) -> &str {
            self.0.name()
        }
        fn single_variant(&self) -> bool {
            self.0.single_variant()
        }
        async fn search(
            &self,
            keyword: &str,
        ) -> Result<Vec<LegislativeItem>, crate::error::SourceError> {
            self.0.search(keyword).await
        }
    }

    fn boxed(fakes: &[Arc<FakeSource>]) -> Vec<Box<dyn ItemSource>> {
        fakes
            .iter()
            .map(|f| Box::new(Shared(Arc::clone(f))) as Box<dyn ItemSource>)
            .collect()
    }

    #[tokio::test]
    async fn test_primary_hit_skips_secondary() {
        let senado = Arc::new(
            FakeSource::new(Origin::Senado, "senado")
                .answer("educacao", vec![item(Origin::Senado, Some(2021), "1")]),
        );
        let camara = Arc::new(
            FakeSource::new(Origin::Camara, "camara")
                .answer("educação", vec![item(Origin::Camara, Some(2022), "2")]),
        );
        let outcome = search_with_fallback(&boxed(&[senado.clone(), camara.clone()]), "educação").await;

        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.origin, Some(Origin::Senado));
        assert_eq!(outcome.variant.as_deref(), Some("educacao"));
        assert_eq!(senado.calls(), vec!["educação", "educacao"]);
        assert!(camara.calls().is_empty());
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Empty);
        assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Hits(1));
    }

    #[tokio::test]
    async fn test_falls_back_after_all_variants() {
        let senado = Arc::new(FakeSource::new(Origin::Senado, "senado"));
        let camara = Arc::new(
            FakeSource::new(Origin::Camara, "camara")
                .answer("Meio Ambiente", vec![item(Origin::Camara, Some(2023), "9")]),
        );
        let outcome =
            search_with_fallback(&boxed(&[senado.clone(), camara.clone()]), "meio ambiente").await;

        assert_eq!(senado.calls(), vec!["meio ambiente", "Meio Ambiente", "MEIO AMBIENTE"]);
        assert_eq!(camara.calls(), vec!["meio ambiente", "Meio Ambiente"]);
        assert_eq!(outcome.origin, Some(Origin::Camara));
        assert_eq!(outcome.variant.as_deref(), Some("Meio Ambiente"));
    }

    #[tokio::test]
    async fn test_failures_are_treated_as_empty() {
        let senado = Arc::new(
            FakeSource::new(Origin::Senado, "senado")
                .fail("Saúde", 500)
                .fail("saude", 503)
                .answer("SAÚDE", vec![item(Origin::Senado, Some(2020), "3")]),
        );
        let outcome = search_with_fallback(&boxed(&[senado.clone()]), "Saúde").await;

        assert_eq!(outcome.items.len(), 1);
        assert!(matches!(outcome.attempts[0].outcome, AttemptOutcome::Failed(_)));
        assert!(matches!(outcome.attempts[1].outcome, AttemptOutcome::Failed(_)));
        // "Saúde" is already title case, so only three spellings exist.
        assert_eq!(senado.calls(), vec!["Saúde", "saude", "SAÚDE"]);
    }

    #[tokio::test]
    async fn test_nothing_found_anywhere() {
        let senado = Arc::new(FakeSource::new(Origin::Senado, "senado").fail("xyz", 502));
        let camara = Arc::new(FakeSource::new(Origin::Camara, "camara"));
        let outcome = search_with_fallback(&boxed(&[senado.clone(), camara.clone()]), "xyz").await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.origin, None);
        assert_eq!(outcome.variant, None);
        assert_eq!(outcome.attempts.len(), 6);
    }

    #[tokio::test]
    async fn test_single_variant_source_called_once() {
        let mut stf = FakeSource::new(Origin::Stf, "stf");
        stf.single = true;
        let stf = Arc::new(stf);
        let outcome = search_with_fallback(&boxed(&[stf.clone()]), "Direito Penal").await;

        assert!(outcome.is_empty());
        assert_eq!(stf.calls(), vec!["Direito Penal"]);
    }

    #[tokio::test]
    async fn test_blank_keyword_makes_no_calls() {
        let senado = Arc::new(FakeSource::new(Origin::Senado, "senado"));
        let outcome = search_with_fallback(&boxed(&[senado.clone()]), "   ").await;

        assert!(outcome.is_empty());
        assert!(outcome.attempts.is_empty());
        assert!(senado.calls().is_empty());
    }

    #[tokio::test]
    async fn test_http_failures_recorded_as_failed_attempts() {
        use crate::models::AttemptOutcome;
        use crate::sources::camara::CamaraSource;
        use crate::sources::senado::SenadoSource;
        use reqwest::Client;

        let mut senado_server = mockito::Server::new_async().await;
        let senado_mock = senado_server
            .mock("GET", "/materia/pesquisa")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(4)
            .create_async()
            .await;
        let mut camara_server = mockito::Server::new_async().await;
        let camara_mock = camara_server
            .mock("GET", "/proposicoes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"dados": ["#)
            .expect(4)
            .create_async()
            .await;

        let sources: Vec<Box<dyn ItemSource>> = vec![
            Box::new(SenadoSource::new(Client::new(), senado_server.url())) as Box<dyn ItemSource>,
            Box::new(CamaraSource::new(Client::new(), camara_server.url(), 100)),
        ];
        let outcome = search_with_fallback(&sources, "educação").await;
        senado_mock.assert_async().await;
        camara_mock.assert_async().await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.attempts.len(), 8);
        assert_eq!(
            outcome.attempts[0].outcome,
            AttemptOutcome::Failed("endpoint answered with HTTP 500".to_string())
        );
        match &outcome.attempts[7].outcome {
            AttemptOutcome::Failed(reason) => assert!(reason.starts_with("malformed response")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
