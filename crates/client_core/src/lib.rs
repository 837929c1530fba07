//! Client-side orchestration core of the fraud-review console.
//!
//! [`CaseSession`] sequences case retrieval, decision requests, and
//! investigation requests against the remote scoring service, merges their
//! results into one authoritative view, and absorbs every service failure
//! into display state so the session stays usable.

use shared::{
    domain::TransactionId,
    protocol::{CasePacket, DecisionPacket, HealthStatus, InvestigationPacket, KpiSnapshot},
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

pub mod credentials;
pub mod mask;
pub mod service;

pub use credentials::{CredentialStore, FileCredentialStore};
pub use mask::{mask, MaskKind};
pub use service::{ScoringClient, ServiceError};

/// Load progress of an independent state axis (case lookup, KPI refresh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Progress of the deeper analysis. A failed run reverts to `Idle`, making
/// it indistinguishable from one never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvestigationState {
    #[default]
    Idle,
    Running,
    Completed,
}

struct SessionState {
    trans_id: TransactionId,
    case_status: LoadStatus,
    case: Option<CasePacket>,
    decision: Option<DecisionPacket>,
    investigation: Option<InvestigationPacket>,
    investigation_state: InvestigationState,
    kpi_status: LoadStatus,
    kpis: Option<KpiSnapshot>,
    last_error: Option<String>,
    reveal_pii: bool,
    api_key: String,
    client: ScoringClient,
}

/// Cloned display state for the presentation layer. The effective decision
/// is derived here rather than stored, so the two packet slots can never
/// diverge from what is shown.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub trans_id: TransactionId,
    pub case_status: LoadStatus,
    pub case: Option<CasePacket>,
    pub decision: Option<DecisionPacket>,
    pub investigation: Option<InvestigationPacket>,
    pub investigation_state: InvestigationState,
    pub kpi_status: LoadStatus,
    pub kpis: Option<KpiSnapshot>,
    pub last_error: Option<String>,
    pub reveal_pii: bool,
}

impl SessionSnapshot {
    /// The most authoritative verdict currently known: the investigation's
    /// decision core when an investigation packet exists, else the plain
    /// decision packet.
    pub fn effective_decision(&self) -> Option<&DecisionPacket> {
        self.investigation
            .as_ref()
            .map(|packet| &packet.decision)
            .or(self.decision.as_ref())
    }
}

/// The case-session state machine.
///
/// Operations lock the session state, record the transition, release the
/// lock across the network await, then re-lock to commit the response. There
/// is no request cancellation: when two calls to the same operation overlap,
/// the last response to resolve wins, regardless of issue order.
pub struct CaseSession<S: CredentialStore> {
    base_url: Url,
    store: S,
    inner: Mutex<SessionState>,
}

impl<S: CredentialStore> CaseSession<S> {
    /// Seeds the API key from the credential store and builds the first
    /// service client handle.
    pub fn new(base_url: Url, store: S) -> Self {
        let api_key = store.load();
        let client = ScoringClient::new(base_url.clone(), &api_key);
        Self {
            base_url,
            store,
            inner: Mutex::new(SessionState {
                trans_id: TransactionId(String::new()),
                case_status: LoadStatus::Idle,
                case: None,
                decision: None,
                investigation: None,
                investigation_state: InvestigationState::Idle,
                kpi_status: LoadStatus::Idle,
                kpis: None,
                last_error: None,
                reveal_pii: false,
                api_key,
                client,
            }),
        }
    }

    /// Loads the case packet for `id`, making it the active transaction.
    /// A new case invalidates prior verdicts: the decision, investigation,
    /// and investigation progress are cleared up front, whether or not the
    /// load itself succeeds.
    pub async fn load_case(&self, id: TransactionId) {
        let client = {
            let mut state = self.inner.lock().await;
            state.trans_id = id.clone();
            state.case_status = LoadStatus::Loading;
            state.decision = None;
            state.investigation = None;
            state.investigation_state = InvestigationState::Idle;
            state.last_error = None;
            state.client.clone()
        };

        match client.get_case(&id).await {
            Ok(packet) => {
                info!(trans_id = %id, found = packet.found, "case loaded");
                let mut state = self.inner.lock().await;
                state.case = Some(packet);
                state.case_status = LoadStatus::Loaded;
            }
            Err(err) => {
                warn!(trans_id = %id, "case load failed: {err}");
                let mut state = self.inner.lock().await;
                state.case = None;
                state.case_status = LoadStatus::Error;
                state.last_error = Some(err.message().to_string());
            }
        }
    }

    /// Requests a machine decision for `id`. On success the result becomes
    /// the current decision and supersedes any stale investigation; on
    /// failure both slots are left untouched.
    pub async fn request_decision(&self, id: TransactionId) {
        let client = {
            let mut state = self.inner.lock().await;
            state.trans_id = id.clone();
            state.last_error = None;
            state.client.clone()
        };

        match client.post_decision(&id).await {
            Ok(packet) => {
                info!(
                    trans_id = %id,
                    decision = %packet.decision,
                    risk_score = packet.risk_score,
                    "decision received"
                );
                let mut state = self.inner.lock().await;
                state.decision = Some(packet);
                state.investigation = None;
            }
            Err(err) => {
                warn!(trans_id = %id, "decision request failed: {err}");
                let mut state = self.inner.lock().await;
                state.last_error = Some(err.message().to_string());
            }
        }
    }

    /// Runs the deeper multi-step analysis for `id`. At most one
    /// investigation may be in flight per session; a call while one is
    /// running is a no-op. A successful result fills both the investigation
    /// and the decision slot. A failed run reverts progress to idle.
    pub async fn run_investigation(&self, id: TransactionId) {
        let client = {
            let mut state = self.inner.lock().await;
            if state.investigation_state == InvestigationState::Running {
                info!(trans_id = %id, "investigation already running; request ignored");
                return;
            }
            state.trans_id = id.clone();
            state.investigation_state = InvestigationState::Running;
            state.last_error = None;
            state.client.clone()
        };

        match client.post_investigate(&id).await {
            Ok(packet) => {
                info!(
                    trans_id = %id,
                    decision = %packet.decision.decision,
                    risk_score = packet.decision.risk_score,
                    "investigation completed"
                );
                let mut state = self.inner.lock().await;
                state.decision = Some(packet.decision.clone());
                state.investigation = Some(packet);
                state.investigation_state = InvestigationState::Completed;
            }
            Err(err) => {
                warn!(trans_id = %id, "investigation failed: {err}");
                let mut state = self.inner.lock().await;
                state.investigation_state = InvestigationState::Idle;
                state.last_error = Some(err.message().to_string());
            }
        }
    }

    /// Refreshes aggregate KPIs for a trailing window. Independent of case
    /// state: only the KPI axis moves, whatever the outcome.
    pub async fn refresh_kpis(&self, window_days: u32) {
        let client = {
            let mut state = self.inner.lock().await;
            state.kpi_status = LoadStatus::Loading;
            state.client.clone()
        };

        match client.get_kpis(window_days).await {
            Ok(snapshot) => {
                info!(window_days, "kpis refreshed");
                let mut state = self.inner.lock().await;
                state.kpis = Some(snapshot);
                state.kpi_status = LoadStatus::Loaded;
            }
            Err(err) => {
                warn!(window_days, "kpi refresh failed: {err}");
                let mut state = self.inner.lock().await;
                state.kpi_status = LoadStatus::Error;
                state.last_error = Some(err.message().to_string());
            }
        }
    }

    /// Connectivity probe. Session state is not involved, so the result is
    /// returned to the caller instead of being absorbed.
    pub async fn check_health(&self) -> Result<HealthStatus, ServiceError> {
        let client = { self.inner.lock().await.client.clone() };
        client.get_health().await
    }

    /// Persists the key best-effort, updates the in-memory value, and
    /// rebuilds the service client. Requests already in flight complete
    /// under the credential they were issued with.
    pub async fn set_api_key(&self, key: &str) {
        self.store.save(key);
        let mut state = self.inner.lock().await;
        state.api_key = key.to_string();
        state.client = ScoringClient::new(self.base_url.clone(), key);
        info!(configured = !key.is_empty(), "api key updated");
    }

    pub async fn set_reveal_pii(&self, reveal: bool) {
        self.inner.lock().await.reveal_pii = reveal;
    }

    pub async fn api_key(&self) -> String {
        self.inner.lock().await.api_key.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().await;
        SessionSnapshot {
            trans_id: state.trans_id.clone(),
            case_status: state.case_status,
            case: state.case.clone(),
            decision: state.decision.clone(),
            investigation: state.investigation.clone(),
            investigation_state: state.investigation_state,
            kpi_status: state.kpi_status,
            kpis: state.kpis.clone(),
            last_error: state.last_error.clone(),
            reveal_pii: state.reveal_pii,
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
