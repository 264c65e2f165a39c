//! Case submission facade: outbound envelope building and typed access to the
//! decoded reply.
//!
//! # Design
//! `CaseClient` is stateless and holds only the injected `Config`. One
//! request/response pair yields one `CaseResult`; resubmitting means building
//! a new request and parsing its own reply. The vendor's error contract is a
//! literal string sentinel: `ErrorCode == "0"` means success, anything else
//! (including the empty string) means the detailed decision was withheld and
//! decision-dependent accessors return `DecisionUnavailable`.

use serde_json::{json, Value};

use crate::applicant::Applicant;
use crate::config::Config;
use crate::decision::{DetailedDecision, TeResponse};
use crate::envelope::{decode_envelope_bytes, KeyValuePair};
use crate::error::CaseError;
use crate::http::{HttpRequest, HttpResponse};
use crate::xml;

/// The vendor's literal success sentinel for `ErrorCode`.
pub const SUCCESS_ERROR_CODE: &str = "0";

/// `messageType` discriminator values. Always sent: `"P"` for production
/// traffic, `"T"` otherwise.
const MESSAGE_TYPE_PRODUCTION: &str = "P";
const MESSAGE_TYPE_TEST: &str = "T";

const LANGUAGE: &str = "en-CA";

/// Stateless client for the on-demand case scoring endpoint.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller executes the HTTP round-trip between
/// `build_case_request` and `parse_case_response`.
#[derive(Debug, Clone)]
pub struct CaseClient {
    config: Config,
}

impl CaseClient {
    pub fn new(mut config: Config) -> Self {
        config.url = config.url.trim_end_matches('/').to_string();
        Self { config }
    }

    /// Build the outbound scoring request for one applicant.
    ///
    /// `Fields` is a sequence, not a mapping — the vendor expects the entries
    /// in order: `ExternalApplicationId`, `TUAdditionalData`, `SessionID`,
    /// `Language`, `Applicant`, `messageType`.
    pub fn build_case_request(&self, applicant: &Applicant) -> Result<HttpRequest, CaseError> {
        let message_type = if self.config.production {
            MESSAGE_TYPE_PRODUCTION
        } else {
            MESSAGE_TYPE_TEST
        };
        let fields = vec![
            KeyValuePair::new("ExternalApplicationId", applicant.external_application_id.as_str()),
            KeyValuePair::new("TUAdditionalData", transunion_additional_data()),
            KeyValuePair::new("SessionID", applicant.session_id.as_str()),
            KeyValuePair::new("Language", LANGUAGE),
            KeyValuePair::new("Applicant", applicant.to_xml()),
            KeyValuePair::new("messageType", message_type),
        ];

        let payload = json!({
            "Authentication": {
                "Type": "OnDemand",
                "UserId": self.config.username,
                "Password": self.config.password,
            },
            "RequestInfo": {
                "SolutionSetId": self.config.solution_set_id,
                "ExecuteLatestVersion": true,
                "ExecutionMode": 3,
            },
            "Fields": fields,
        });
        let body =
            serde_json::to_string(&payload).map_err(|e| CaseError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            url: self.config.url.clone(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    /// Decode a vendor reply into a `CaseResult`.
    ///
    /// A non-2xx status is a transport failure and is passed through
    /// uninterpreted. A 2xx body is decoded through all three envelope layers
    /// and the typed `TEResponse` extracted eagerly, so shape problems surface
    /// here as `MalformedEnvelope` rather than at accessor time.
    pub fn parse_case_response(&self, response: HttpResponse) -> Result<CaseResult, CaseError> {
        if !(200..300).contains(&response.status) {
            return Err(CaseError::Transport {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        let envelope =
            decode_envelope_bytes(&response.body, self.config.repair_legacy_encoding)?;
        let te = TeResponse::from_envelope(&envelope)?;
        Ok(CaseResult { envelope, te })
    }
}

/// Fixed auxiliary metadata template the vendor requires on every request.
fn transunion_additional_data() -> String {
    xml::build_document("TUAdditionalData", &[("ReferenceID", "")])
}

/// The decoded result of one case submission.
///
/// Accessors split into two classes: error code/text are always readable,
/// while decision-dependent fields return `DecisionUnavailable` when the
/// vendor reported an error (it omits the detailed decision on failures) or
/// did not compute the requested signal.
#[derive(Debug, Clone)]
pub struct CaseResult {
    envelope: Value,
    te: TeResponse,
}

impl CaseResult {
    /// The full normalized envelope, for fields this facade does not name.
    pub fn envelope(&self) -> &Value {
        &self.envelope
    }

    pub fn error_code(&self) -> &str {
        &self.te.error_code
    }

    pub fn error_text(&self) -> Option<&str> {
        self.te.error_text.as_deref()
    }

    /// True iff the vendor reported a failure for this case.
    pub fn error(&self) -> bool {
        self.te.error_code != SUCCESS_ERROR_CODE
    }

    pub fn risk(&self) -> Result<&str, CaseError> {
        self.guard("TEvRisk")?;
        require(self.te.risk.as_deref(), "TEvRisk")
    }

    pub fn score(&self) -> Result<f64, CaseError> {
        require(self.decision("Score")?.score, "Score")
    }

    pub fn result(&self) -> Result<&str, CaseError> {
        require(self.decision("Result")?.result.as_deref(), "Result")
    }

    pub fn confidence(&self) -> Result<f64, CaseError> {
        require(self.decision("Confidence")?.confidence, "Confidence")
    }

    pub fn comment(&self) -> Result<&str, CaseError> {
        require(self.decision("Comment")?.comment.as_deref(), "Comment")
    }

    pub fn is_phone_risky(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsPhoneRisky")?;
        require(decision.computed_data.phone.is_phone_risky, "IsPhoneRisky")
    }

    pub fn is_disposable_email(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsDisposableEmail")?;
        require(decision.computed_data.customer.is_disposable_email, "IsDisposableEmail")
    }

    pub fn is_suspicious_history(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsSuspiciousHistory")?;
        require(decision.computed_data.customer.is_suspicious_history, "IsSuspiciousHistory")
    }

    pub fn is_bad_history(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsBadHistory")?;
        require(decision.computed_data.customer.is_bad_history, "IsBadHistory")
    }

    pub fn is_ip_country_domestic(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsIPCountryDomestic")?;
        require(decision.computed_data.location.is_ip_country_domestic, "IsIPCountryDomestic")
    }

    pub fn is_email_domain_blacklisted(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsEmailDomainBlackListed")?;
        require(
            decision.computed_data.black_list.is_email_domain_black_listed,
            "IsEmailDomainBlackListed",
        )
    }

    pub fn is_full_email_address_blacklisted(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsFullEmailAddressBlackListed")?;
        require(
            decision.computed_data.black_list.is_full_email_address_black_listed,
            "IsFullEmailAddressBlackListed",
        )
    }

    pub fn is_post_code_blacklisted(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsPostCodeBlackListed")?;
        require(
            decision.computed_data.black_list.is_post_code_black_listed,
            "IsPostCodeBlackListed",
        )
    }

    pub fn is_ip_blacklisted(&self) -> Result<bool, CaseError> {
        let decision = self.decision("IsIPBlackListed")?;
        require(decision.computed_data.black_list.is_ip_black_listed, "IsIPBlackListed")
    }

    fn guard(&self, field: &'static str) -> Result<(), CaseError> {
        if self.error() {
            return Err(CaseError::DecisionUnavailable { field });
        }
        Ok(())
    }

    fn decision(&self, field: &'static str) -> Result<&DetailedDecision, CaseError> {
        self.guard(field)?;
        self.te
            .detailed_decision
            .as_ref()
            .ok_or(CaseError::DecisionUnavailable { field })
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, CaseError> {
    value.ok_or(CaseError::DecisionUnavailable { field })
}
