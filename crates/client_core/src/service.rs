//! Typed HTTP client for the remote scoring service.
//!
//! One instance per API key value; the session rebuilds the client whenever
//! the key changes, so a request already issued keeps the credential it was
//! issued with. Every operation is single-shot: no internal retry and no
//! timeout beyond the transport's own.

use reqwest::{header::HeaderValue, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::TransactionId,
    error::ApiErrorBody,
    protocol::{
        CasePacket, DecisionPacket, DecisionRequest, HealthStatus, InvestigateRequest,
        InvestigationPacket, KpiSnapshot,
    },
};
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const API_KEY_HEADER: &str = "X-API-Key";

const CASE_FALLBACK: &str = "Unable to fetch case. Ensure the API is running.";
const DECISION_FALLBACK: &str = "Decision failed.";
const INVESTIGATE_FALLBACK: &str = "Investigation failed.";
const KPIS_FALLBACK: &str = "Failed to load KPIs.";
const HEALTH_FALLBACK: &str = "Health check failed.";

/// Failure of a single service call. Server-reported detail is surfaced
/// verbatim; everything else falls back to the operation's generic message.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{fallback}")]
    Transport {
        fallback: &'static str,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("{}", detail.as_deref().unwrap_or(*fallback))]
    Server {
        fallback: &'static str,
        status: StatusCode,
        detail: Option<String>,
    },
}

impl ServiceError {
    fn transport(fallback: &'static str, source: Option<reqwest::Error>) -> Self {
        Self::Transport { fallback, source }
    }

    /// The display message for the failure banner.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { fallback, .. } => fallback,
            Self::Server {
                fallback, detail, ..
            } => detail.as_deref().unwrap_or(fallback),
        }
    }
}

#[derive(Clone)]
pub struct ScoringClient {
    http: Client,
    base_url: Url,
    api_key: Option<HeaderValue>,
}

impl ScoringClient {
    /// Binds a client to the service base URL and the current API key. An
    /// empty key means anonymous requests; whether the server accepts those
    /// is its policy, not ours.
    pub fn new(base_url: Url, api_key: &str) -> Self {
        let api_key = if api_key.is_empty() {
            None
        } else {
            match HeaderValue::from_str(api_key) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    Some(value)
                }
                Err(_) => {
                    warn!("api key is not a valid header value; sending requests anonymously");
                    None
                }
            }
        };
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    pub async fn get_case(&self, id: &TransactionId) -> Result<CasePacket, ServiceError> {
        let url = self.endpoint(&["case", id.as_str()], CASE_FALLBACK)?;
        self.execute(self.http.get(url), CASE_FALLBACK).await
    }

    pub async fn post_decision(&self, id: &TransactionId) -> Result<DecisionPacket, ServiceError> {
        let url = self.endpoint(&["decision"], DECISION_FALLBACK)?;
        let request = self.http.post(url).json(&DecisionRequest {
            trans_id: id.clone(),
        });
        self.execute(request, DECISION_FALLBACK).await
    }

    pub async fn post_investigate(
        &self,
        id: &TransactionId,
    ) -> Result<InvestigationPacket, ServiceError> {
        let url = self.endpoint(&["investigate"], INVESTIGATE_FALLBACK)?;
        let request = self.http.post(url).json(&InvestigateRequest {
            trans_id: id.clone(),
        });
        self.execute(request, INVESTIGATE_FALLBACK).await
    }

    pub async fn get_kpis(&self, window_days: u32) -> Result<KpiSnapshot, ServiceError> {
        let url = self.endpoint(&["kpis"], KPIS_FALLBACK)?;
        let request = self
            .http
            .get(url)
            .query(&[("window_days", window_days)]);
        self.execute(request, KPIS_FALLBACK).await
    }

    pub async fn get_health(&self) -> Result<HealthStatus, ServiceError> {
        let url = self.endpoint(&["health"], HEALTH_FALLBACK)?;
        self.execute(self.http.get(url), HEALTH_FALLBACK).await
    }

    /// Appends path segments to the base URL. Pushing through
    /// `path_segments_mut` percent-encodes reserved characters, so the server
    /// decodes back to the literal identifier.
    fn endpoint(&self, segments: &[&str], fallback: &'static str) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ServiceError::transport(fallback, None))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &'static str,
    ) -> Result<T, ServiceError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.clone()),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|source| ServiceError::transport(fallback, Some(source)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .map(|body| body.detail);
            return Err(ServiceError::Server {
                fallback,
                status,
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ServiceError::transport(fallback, Some(source)))
    }
}
