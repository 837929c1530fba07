use serde::{Deserialize, Serialize};

/// Structured error payload returned by the scoring service on non-2xx
/// responses, e.g. `{"detail": "transaction_not_found"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
