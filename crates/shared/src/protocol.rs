use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{TransactionId, Verdict};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub trans_id: TransactionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigateRequest {
    pub trans_id: TransactionId,
}

/// Transaction row joined with the customer record. PII fields are optional
/// because the service redacts or omits them depending on its own policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub trans_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_age_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub trans_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarCases {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_trans_id: Option<String>,
    #[serde(default)]
    pub similar_cases: Vec<SimilarCase>,
}

/// Case lookup result. Enrichment blocks are served loosely typed (sqlite
/// rows jsonified as-is) and are display-only, so they stay opaque values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasePacket {
    #[serde(default)]
    pub found: bool,
    #[serde(default, alias = "transaction_id")]
    pub trans_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_history: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_intel: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disputes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_cases: Option<SimilarCases>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPacket {
    pub transaction_id: String,
    pub model_version: String,
    pub risk_score: f64,
    pub decision: Verdict,
    #[serde(default)]
    pub reason_codes: Vec<String>,
    #[serde(default)]
    pub rule_hits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log_path: Option<String>,
}

/// Deeper analysis result. Carries the same decision core as a plain
/// scoring response plus investigation artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationPacket {
    #[serde(flatten)]
    pub decision: DecisionPacket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_outputs: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub window_days: u32,
    pub total_events: u64,
    pub decline_rate: f64,
    pub challenge_rate: f64,
    pub allow_rate: f64,
    pub total_volume: f64,
    pub chargeback_amount: f64,
    pub loss_rate_proxy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}
