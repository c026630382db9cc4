//! Senado Federal open-data search (primary source).
//!
//! Queries `materia/pesquisa` on the Senate open-data API with the keyword in
//! `palavraChave`. The JSON is a direct conversion of the XML service, which
//! has two quirks handled here:
//!
//! - a single match is returned as an object, not a one-element array
//! - numeric fields (`AnoMateria`, `NumeroMateria`) usually arrive as strings
//!
//! Item URLs point at the public web page of the bill, built from
//! `CodigoMateria`.

use super::{ItemSource, Loose, OneOrMany, fetch_json, non_empty};
use crate::config::endpoint;
use crate::error::SourceError;
use crate::models::{LegislativeItem, Origin};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

const WEB_BASE: &str = "https://www25.senado.leg.br/web/atividade/materias/-/materia";

#[derive(Debug)]
pub struct SenadoSource {
    client: Client,
    base: String,
}

impl SenadoSource {
    pub fn new(client: Client, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }
}

#[async_trait]
impl ItemSource for SenadoSource {
    fn origin(&self) -> Origin {
        Origin::Senado
    }

    fn name(&self) -> &str {
        "senado"
    }

    #[instrument(level = "info", skip(self), fields(source = "senado"))]
    async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError> {
        let url = endpoint(&self.base, "materia/pesquisa");
        let request = self
            .client
            .get(&url)
            .query(&[("palavraChave", keyword), ("format", "json")]);
        let response: SearchResponse = fetch_json(request).await?;
        let items = response.into_items();
        info!(count = items.len(), "Senado search finished");
        Ok(items)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchResponse {
    #[serde(default)]
    pesquisa_materia: Option<PesquisaMateria>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PesquisaMateria {
    #[serde(default)]
    materias: Option<Materias>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Materias {
    #[serde(default)]
    materia: OneOrMany<Materia>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Materia {
    #[serde(default)]
    identificacao_materia: Identificacao,
    #[serde(default)]
    ementa: Option<String>,
    #[serde(default)]
    dados_basicos_materia: Option<DadosBasicos>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Identificacao {
    #[serde(default)]
    codigo_materia: Option<Loose>,
    #[serde(default)]
    sigla_subtipo_materia: Option<String>,
    #[serde(default)]
    numero_materia: Option<Loose>,
    #[serde(default)]
    ano_materia: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DadosBasicos {
    #[serde(default)]
    ementa_materia: Option<String>,
}

impl SearchResponse {
    fn into_items(self) -> Vec<LegislativeItem> {
        self.pesquisa_materia
            .and_then(|p| p.materias)
            .map(|m| m.materia.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(Materia::into_item)
            .collect()
    }
}

impl Materia {
    fn into_item(self) -> LegislativeItem {
        let id = self.identificacao_materia;
        let summary = non_empty(self.ementa)
            .or_else(|| non_empty(self.dados_basicos_materia.and_then(|d| d.ementa_materia)))
            .unwrap_or_default();
        let url = non_empty(id.codigo_materia.map(Loose::into_text))
            .map(|code| format!("{WEB_BASE}/{code}"))
            .unwrap_or_default();
        LegislativeItem {
            year: id.ano_materia.as_ref().and_then(Loose::as_year),
            kind: non_empty(id.sigla_subtipo_materia),
            number: non_empty(id.numero_materia.map(Loose::into_text)),
            summary,
            url,
            origin: Origin::Senado,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<LegislativeItem> {
        serde_json::from_str::<SearchResponse>(json).unwrap().into_items()
    }

    #[test]
    fn test_parse_array_of_materias() {
        let json = r#"{
            "PesquisaMateria": {
                "Materias": {
                    "Materia": [
                        {
                            "IdentificacaoMateria": {
                                "CodigoMateria": "148123",
                                "SiglaSubtipoMateria": "PL",
                                "NumeroMateria": "00123",
                                "AnoMateria": "2021"
                            },
                            "Ementa": "Dispõe sobre a educação básica."
                        },
                        {
                            "IdentificacaoMateria": {
                                "CodigoMateria": 150001,
                                "SiglaSubtipoMateria": "PEC",
                                "NumeroMateria": "7",
                                "AnoMateria": 2022
                            },
                            "DadosBasicosMateria": { "EmentaMateria": "Altera a Constituição." }
                        }
                    ]
                }
            }
        }"#;
        let items = parse(json);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].year, Some(2021));
        assert_eq!(items[0].kind.as_deref(), Some("PL"));
        assert_eq!(items[0].number.as_deref(), Some("00123"));
        assert_eq!(items[0].summary, "Dispõe sobre a educação básica.");
        assert_eq!(
            items[0].url,
            "https://www25.senado.leg.br/web/atividade/materias/-/materia/148123"
        );
        assert_eq!(items[1].year, Some(2022));
        assert_eq!(items[1].summary, "Altera a Constituição.");
        assert!(items[1].url.ends_with("/150001"));
        assert!(items.iter().all(|i| i.origin == Origin::Senado));
    }

    #[test]
    fn test_parse_single_materia_object() {
        let json = r#"{
            "PesquisaMateria": {
                "Materias": {
                    "Materia": {
                        "IdentificacaoMateria": { "CodigoMateria": "1", "AnoMateria": "2020" },
                        "Ementa": "Única."
                    }
                }
            }
        }"#;
        let items = parse(json);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].year, Some(2020));
        assert_eq!(items[0].kind, None);
    }

    #[test]
    fn test_parse_missing_levels_is_empty() {
        assert!(parse(r#"{}"#).is_empty());
        assert!(parse(r#"{"PesquisaMateria": {}}"#).is_empty());
        assert!(parse(r#"{"PesquisaMateria": {"Materias": {}}}"#).is_empty());
    }

    #[test]
    fn test_parse_bad_year_is_none() {
        let json = r#"{"PesquisaMateria": {"Materias": {"Materia": [
            {"IdentificacaoMateria": {"AnoMateria": "s/d"}}
        ]}}}"#;
        let items = parse(json);
        assert_eq!(items[0].year, None);
        assert_eq!(items[0].summary, "");
    }

    #[test]
    fn test_missing_code_leaves_url_empty() {
        let json = r#"{"PesquisaMateria": {"Materias": {"Materia": [
            {"IdentificacaoMateria": {"AnoMateria": "2021"}, "Ementa": "Sem código."},
            {"IdentificacaoMateria": {"CodigoMateria": " ", "AnoMateria": "2021"}}
        ]}}}"#;
        let items = parse(json);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.url.is_empty()));
    }

    #[tokio::test]
    async fn test_search_sends_keyword_and_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/materia/pesquisa")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("palavraChave".into(), "educação".into()),
                mockito::Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"PesquisaMateria": {"Materias": {"Materia": {
                    "IdentificacaoMateria": {"CodigoMateria": "9", "AnoMateria": "2023"},
                    "Ementa": "Uma."
                }}}}"#,
            )
            .create_async()
            .await;

        let source = SenadoSource::new(Client::new(), server.url());
        let items = source.search("educação").await.unwrap();
        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].year, Some(2023));
        assert!(items[0].url.ends_with("/materia/9"));
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/materia/pesquisa")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let source = SenadoSource::new(Client::new(), server.url());
        let err = source.search("educação").await.unwrap_err();
        assert!(matches!(err, SourceError::Status(500)));
    }
}
