//! External data sources for legislative and judicial records.
//!
//! Each source implements [`ItemSource`] and answers one keyword query with a
//! list of [`LegislativeItem`]s. The fallback loop in [`crate::search`] only
//! sees this trait, which keeps it testable without a network.
//!
//! # Sources
//!
//! | Source | Module | Role | Notes |
//! |--------|--------|------|-------|
//! | Senado Federal | [`senado`] | primary | nested JSON, single hits are not wrapped in an array |
//! | Câmara dos Deputados | [`camara`] | fallback | flat `dados` array |
//! | STF decisions | [`stf`] | optional third | BigQuery `jobs.query`, needs a billing project |
//!
//! All sources share one [`reqwest::Client`] built by [`http_client`], so the
//! per-call deadline is the same everywhere.

use crate::error::SourceError;
use crate::models::{LegislativeItem, Origin};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub mod camara;
pub mod senado;
pub mod stf;

/// A searchable endpoint.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Body whose records this source returns.
    fn origin(&self) -> Origin;

    /// Short name for logs and the attempt trail.
    fn name(&self) -> &str;

    /// `true` when the source normalizes the keyword itself, so trying more
    /// than one spelling would only repeat the same query.
    fn single_variant(&self) -> bool {
        false
    }

    async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError>;
}

/// Build the shared HTTP client with a fixed per-call deadline.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a request and decode a JSON body.
///
/// Non-success status codes become [`SourceError::Status`]; the body is read
/// as text first so a malformed payload can be logged before it is rejected.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, SourceError> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    debug!(bytes = body.len(), "Received response body");
    serde_json::from_str(&body).map_err(|e| {
        warn!(
            error = %e,
            body_preview = %truncate_for_log(&body, 300),
            "Response did not match the expected schema"
        );
        SourceError::Decode(e)
    })
}

/// Accept either a single object or an array of objects.
///
/// Open-data endpoints that are converted from XML collapse one-element
/// lists into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

/// A scalar that may arrive as a JSON string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Loose {
    Int(i64),
    Text(String),
}

impl Loose {
    pub(crate) fn as_year(&self) -> Option<i32> {
        match self {
            Loose::Int(n) => i32::try_from(*n).ok(),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }

    pub(crate) fn into_text(self) -> String {
        match self {
            Loose::Int(n) => n.to_string(),
            Loose::Text(s) => s,
        }
    }
}

/// Drop empty strings so they render as missing rather than blank.
pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory sources for exercising the fallback loop.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table keyed by exact keyword spelling and
    /// records every call it receives.
    pub struct FakeSource {
        pub origin: Origin,
        pub name: String,
        pub answers: HashMap<String, Result<Vec<LegislativeItem>, u16>>,
        pub calls: Mutex<Vec<String>>,
        pub single: bool,
    }

    impl FakeSource {
        pub fn new(origin: Origin, name: &str) -> Self {
            Self {
                origin,
                name: name.to_string(),
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
                single: false,
            }
        }

        pub fn answer(mut self, keyword: &str, items: Vec<LegislativeItem>) -> Self {
            self.answers.insert(keyword.to_string(), Ok(items));
            self
        }

        pub fn fail(mut self, keyword: &str, status: u16) -> Self {
            self.answers.insert(keyword.to_string(), Err(status));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ItemSource for FakeSource {
        fn origin(&self) -> Origin {
            self.origin
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn single_variant(&self) -> bool {
            self.single
        }

        async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError> {
            self.calls.lock().unwrap().push(keyword.to_string());
            match self.answers.get(keyword) {
                Some(Ok(items)) => Ok(items.clone()),
                Some(Err(code)) => Err(SourceError::Status(*code)),
                None => Ok(Vec::new()),
            }
        }
    }

    /// Lets a test keep a handle on the fake after boxing it as a source.
    #[async_trait]
    impl ItemSource for std::sync::Arc<FakeSource> {
        fn origin(&self) -> Origin {
            (**self).origin()
        }

        fn name(&self) -> &str {
            (**self).name()
        }

        fn single_variant(&self) -> bool {
            (**self).single_variant()
        }

        async fn search(&self, keyword: &str) -> Result<Vec<LegislativeItem>, SourceError> {
            (**self).search(keyword).await
        }
    }

    pub fn item(origin: Origin, year: Option<i32>, number: &str) -> LegislativeItem {
        LegislativeItem {
            year,
            kind: Some("PL".to_string()),
            number: Some(number.to_string()),
            summary: format!("Item {number}"),
            url: format!("https://example.org/{number}"),
            origin,
        }
    }
}
