//! Typed view of the decoded `TEResponse`.
//!
//! # Design
//! `CaseClient::parse_case_response` deserializes these eagerly from the
//! normalized envelope, so `CaseResult` accessors are plain field reads with
//! no path traversal at access time. Every decision field is optional — the
//! vendor omits `TrustevDetailedDecision` entirely on error responses, and
//! individual signals come and go with the configured solution set. Unknown
//! fields in the vendor reply are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CaseError;

/// The decoded XML layer of the reply, with the detailed decision already
/// JSON-parsed when present.
#[derive(Debug, Clone, Deserialize)]
pub struct TeResponse {
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "ErrorText")]
    pub error_text: Option<String>,
    #[serde(rename = "TEvRisk")]
    pub risk: Option<String>,
    #[serde(rename = "TrustevDetailedDecision")]
    pub detailed_decision: Option<DetailedDecision>,
}

impl TeResponse {
    /// Extract the typed view from a normalized envelope, as produced by
    /// `envelope::decode_envelope`. A missing `ContextData.TEResponse` path or
    /// a missing `ErrorCode` is a malformed reply.
    pub fn from_envelope(envelope: &Value) -> Result<Self, CaseError> {
        let te = envelope
            .get("ContextData")
            .and_then(|context| context.get("TEResponse"))
            .ok_or_else(|| {
                CaseError::MalformedEnvelope("ContextData.TEResponse missing".to_string())
            })?;
        serde_json::from_value(te.clone())
            .map_err(|e| CaseError::MalformedEnvelope(format!("TEResponse fields: {e}")))
    }
}

/// The vendor's detailed decision, present only on successful evaluations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DetailedDecision {
    pub score: Option<f64>,
    pub result: Option<String>,
    pub confidence: Option<f64>,
    pub comment: Option<String>,
    pub computed_data: ComputedData,
}

/// Per-category risk signals computed by the vendor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ComputedData {
    pub customer: Customer,
    pub phone: Phone,
    pub location: Location,
    pub black_list: BlackList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Customer {
    pub is_disposable_email: Option<bool>,
    pub is_suspicious_history: Option<bool>,
    pub is_bad_history: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Phone {
    pub is_phone_risky: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Location {
    #[serde(rename = "IsIPCountryDomestic")]
    pub is_ip_country_domestic: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BlackList {
    pub is_email_domain_black_listed: Option<bool>,
    pub is_full_email_address_black_listed: Option<bool>,
    pub is_post_code_black_listed: Option<bool>,
    #[serde(rename = "IsIPBlackListed")]
    pub is_ip_black_listed: Option<bool>,
}
