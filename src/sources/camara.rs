//! Câmara dos Deputados open-data search (fallback source).
//!
//! `GET /proposicoes?keywords=..&itens=..` returns a flat `dados` array whose
//! entries already carry a direct resource `uri`.

use super::{ItemSource, Loose, fetch_json, non_empty};
use crate::config::endpoint;
use crate::error::SourceError;
use crate::models::{LegislativeItem, Origin};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug)]
pub struct CamaraSource {
    client: Client,
    base: String,
    page_size: u32,
}

impl CamaraSource {
    pub fn new(client: Client, base: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            base: base.into(),
            page_size,
        }
    }
}

#[async_trait]
impl ItemSource for CamaraSource {
    fn origin(&self) -> Origin {
        Origin::Camara
    }

    fn name(&self) -> &str {
        "camara"
    }

    #[instrument(level = "info", skip(self), fields(source = "camara"))]
    async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError> {
        let url = endpoint(&self.base, "proposicoes");
        let page_size = self.page_size.to_string();
        let request = self.client.get(&url).query(&[
            ("keywords", keyword),
            ("itens", page_size.as_str()),
            ("ordem", "DESC"),
            ("ordenarPor", "id"),
        ]);
        let response: ProposicoesResponse = fetch_json(request).await?;
        let items: Vec<LegislativeItem> = response
            .dados
            .into_iter()
            .map(Proposicao::into_item)
            .collect();
        info!(count = items.len(), "Câmara search finished");
        Ok(items)
    }
}

#[derive(Debug, Deserialize)]
struct ProposicoesResponse {
    #[serde(default)]
    dados: Vec<Proposicao>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Proposicao {
    #[serde(default)]
    sigla_tipo: Option<String>,
    #[serde(default)]
    numero: Option<Loose>,
    #[serde(default)]
    ano: Option<Loose>,
    #[serde(default)]
    ementa: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl Proposicao {
    fn into_item(self) -> LegislativeItem {
        LegislativeItem {
            year: self.ano.as_ref().and_then(Loose::as_year),
            kind: non_empty(self.sigla_tipo),
            number: non_empty(self.numero.map(Loose::into_text)),
            summary: self.ementa.unwrap_or_default().trim().to_string(),
            url: self.uri.unwrap_or_default(),
            origin: Origin::Camara,
        }
    }
}
