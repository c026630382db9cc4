//! STF decisions from a BigQuery-hosted data warehouse (optional third source).
//!
//! The query runs through the BigQuery REST `jobs.query` endpoint under a
//! caller-supplied billing project, which is charged for the bytes scanned.
//! Matching is done in SQL on a lower-cased, punctuation-stripped subject
//! column, so the keyword is normalized once with [`search_term`] and passed
//! as a named parameter, never spliced into the SQL text.

use super::{ItemSource, fetch_json, non_empty};
use crate::config::endpoint;
use crate::error::SourceError;
use crate::keywords::search_term;
use crate::models::{FIRST_YEAR, LAST_YEAR, LegislativeItem, Origin};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_]+\.[A-Za-z0-9_]+$").expect("table regex is valid")
});

const PROCESS_PAGE: &str = "https://portal.stf.jus.br/processos/listarProcessos.asp";

#[derive(Debug)]
pub struct StfSource {
    client: Client,
    bigquery_base: String,
    billing_project: String,
    access_token: String,
    table: String,
    page_size: u32,
    timeout_ms: u64,
}

impl StfSource {
    pub fn new(
        client: Client,
        bigquery_base: impl Into<String>,
        billing_project: impl Into<String>,
        access_token: impl Into<String>,
        table: impl Into<String>,
        page_size: u32,
        timeout_ms: u64,
    ) -> Self {
        Self {
            client,
            bigquery_base: bigquery_base.into(),
            billing_project: billing_project.into(),
            access_token: access_token.into(),
            table: table.into(),
            page_size,
            timeout_ms,
        }
    }

    /// The templated query. Only the table name is interpolated, and it is
    /// validated first.
    fn sql(&self) -> Result<String, SourceError> {
        if !TABLE_NAME.is_match(&self.table) {
            return Err(SourceError::Config(format!(
                "table must be project.dataset.table, got {:?}",
                self.table
            )));
        }
        Ok(format!(
            "SELECT ano, classe, numero, assunto_processo, link \
             FROM `{table}` \
             WHERE ano BETWEEN {first} AND {last} \
             AND LOWER(REGEXP_REPLACE(assunto_processo, r'[^\\w\\s]', '')) LIKE CONCAT('%', @termo, '%') \
             LIMIT {limit}",
            table = self.table,
            first = FIRST_YEAR,
            last = LAST_YEAR,
            limit = self.page_size,
        ))
    }

    fn request_body(&self, term: &str) -> Result<QueryRequest, SourceError> {
        Ok(QueryRequest {
            query: self.sql()?,
            use_legacy_sql: false,
            parameter_mode: "NAMED",
            query_parameters: vec![QueryParameter {
                name: "termo",
                parameter_type: ParameterType { kind: "STRING" },
                parameter_value: ParameterValue {
                    value: term.to_string(),
                },
            }],
            max_results: self.page_size,
            timeout_ms: self.timeout_ms,
        })
    }
}

#[async_trait]
impl ItemSource for StfSource {
    fn origin(&self) -> Origin {
        Origin::Stf
    }

    fn name(&self) -> &str {
        "stf"
    }

    fn single_variant(&self) -> bool {
        true
    }

    #[instrument(level = "info", skip(self), fields(source = "stf", project = %self.billing_project))]
    async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError> {
        let term = search_term(keyword);
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.request_body(&term)?;
        let url = endpoint(
            &self.bigquery_base,
            &format!("projects/{}/queries", self.billing_project),
        );
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body);
        let response: QueryResponse = fetch_json(request).await?;
        if !response.job_complete {
            warn!("BigQuery job did not complete within the deadline");
        }
        let items: Vec<LegislativeItem> = response.rows.into_iter().map(Row::into_item).collect();
        info!(count = items.len(), "STF search finished");
        Ok(items)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: String,
    use_legacy_sql: bool,
    parameter_mode: &'static str,
    query_parameters: Vec<QueryParameter>,
    max_results: u32,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryParameter {
    name: &'static str,
    parameter_type: ParameterType,
    parameter_value: ParameterValue,
}

#[derive(Debug, Serialize)]
struct ParameterType {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ParameterValue {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    #[serde(default)]
    rows: Vec<Row>,
}

/// One result row; cells follow the SELECT order.
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    f: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    v: Value,
}

impl Row {
    fn cell(&self, i: usize) -> Option<String> {
        match self.f.get(i).map(|c| &c.v) {
            Some(Value::String(s)) => non_empty(Some(s.clone())),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn into_item(self) -> LegislativeItem {
        let year = self.cell(0).and_then(|y| y.trim().parse().ok());
        let kind = self.cell(1);
        let number = self.cell(2);
        let summary = self.cell(3).unwrap_or_default();
        let url = self.cell(4).unwrap_or_else(|| match (&kind, &number) {
            (Some(k), Some(n)) => format!("{PROCESS_PAGE}?classe={k}&numeroProcesso={n}"),
            _ => String::new(),
        });
        LegislativeItem {
            year,
            kind,
            number,
            summary,
            url,
            origin: Origin::Stf,
        }
    }
}
