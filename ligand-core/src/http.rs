use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::HttpConfig;
use crate::node::Node;
use crate::resolver::Resolve;
use crate::transformer::Transformer;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("invalid href: {0}")]
    InvalidHref(#[from] url::ParseError),
}

/// Resolves references by fetching them over HTTP.
///
/// A successful response body is run through the transformer, so resolved
/// content comes back typed. Any failure (bad URL, transport error, non-2xx
/// status, undecodable body) leaves the reference to the next strategy.
pub struct HttpResolver {
    http: reqwest::Client,
    transformer: Arc<Transformer>,
    config: HttpConfig,
}

impl HttpResolver {
    /// Creates a resolver sending the default headers.
    pub fn new(transformer: Arc<Transformer>) -> Self {
        Self::with_config(transformer, HttpConfig::default())
    }

    /// Creates a resolver with custom request settings.
    pub fn with_config(transformer: Arc<Transformer>, config: HttpConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            transformer,
            config,
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Fetches `href` and decodes the body as JSON.
    #[instrument(skip(self))]
    pub async fn fetch(&self, href: &str) -> Result<Value, FetchError> {
        let url = Url::parse(href)?;

        debug!("Fetching reference");

        let mut request = self.http.get(url).header(ACCEPT, &self.config.accept);
        if let Some(agent) = &self.config.user_agent {
            request = request.header(USER_AGENT, agent);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        debug!("Received document");
        Ok(body)
    }
}

#[async_trait]
impl Resolve for HttpResolver {
    async fn try_resolve(&self, href: &str) -> Option<Node> {
        match self.fetch(href).await {
            Ok(body) => Some(self.transformer.transform(&body)),
            Err(FetchError::Status(status)) => {
                debug!(href, status, "reference not available here");
                None
            }
            Err(err) => {
                warn!(href, error = %err, "failed to fetch reference");
                None
            }
        }
    }
}
