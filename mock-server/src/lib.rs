//! Mock Trustev on-demand scoring endpoint.
//!
//! Speaks the vendor's wire format faithfully: the reply is JSON whose
//! `ContextData` is a `{Key,Value}` array, its `TEResponse` value is a flat
//! XML document, and the XML's `TrustevDetailedDecision` element is a
//! JSON-encoded string. Scoring is deterministic so tests can assert on it:
//! an applicant email with local-part `fraud` scores HIGH with the risk
//! signals raised, everything else scores LOW. Vendor-level failures (bad
//! credentials, missing fields) are reported in-band with HTTP 200 and a
//! non-zero `ErrorCode`, exactly as the real service does.
//!
//! The request DTOs are defined independently from the client crate;
//! integration tests catch schema drift.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CaseRequest {
    #[serde(rename = "Authentication")]
    pub authentication: Authentication,
    #[serde(rename = "RequestInfo")]
    pub request_info: RequestInfo,
    #[serde(rename = "Fields")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Deserialize)]
pub struct Authentication {
    #[serde(rename = "Type")]
    pub auth_type: String,
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestInfo {
    #[serde(rename = "SolutionSetId")]
    pub solution_set_id: String,
    #[serde(rename = "ExecuteLatestVersion")]
    pub execute_latest_version: bool,
    #[serde(rename = "ExecutionMode")]
    pub execution_mode: i64,
}

#[derive(Debug, Deserialize)]
pub struct Field {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

pub fn app() -> Router {
    Router::new().route("/case", post(score_case))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn score_case(Json(request): Json<CaseRequest>) -> Json<Value> {
    if request.authentication.auth_type != "OnDemand"
        || request.authentication.user_id.is_empty()
        || request.authentication.password.is_empty()
    {
        return Json(error_envelope("102", "Authentication failed"));
    }
    if request.request_info.solution_set_id.is_empty() {
        return Json(error_envelope("103", "Invalid solution set"));
    }

    for required in ["ExternalApplicationId", "SessionID", "Applicant"] {
        let present = matches!(field_value(&request.fields, required), Some(s) if !s.is_empty());
        if !present {
            return Json(error_envelope("1", &format!("Missing required field: {required}")));
        }
    }

    let applicant_xml = field_value(&request.fields, "Applicant").unwrap_or_default();
    let fraudulent = extract_element(applicant_xml, "Email")
        .map(|email| email.starts_with("fraud@"))
        .unwrap_or(false);

    let (risk, detail) = if fraudulent {
        (
            "HIGH",
            json!({
                "Score": 92,
                "Result": "Fail",
                "Confidence": 87,
                "Comment": "Multiple risk signals raised",
                "ComputedData": {
                    "Customer": {
                        "IsDisposableEmail": true,
                        "IsSuspiciousHistory": true,
                        "IsBadHistory": true
                    },
                    "Phone": {"IsPhoneRisky": true},
                    "Location": {"IsIPCountryDomestic": false},
                    "BlackList": {
                        "IsEmailDomainBlackListed": true,
                        "IsFullEmailAddressBlackListed": true,
                        "IsPostCodeBlackListed": false,
                        "IsIPBlackListed": true
                    }
                }
            }),
        )
    } else {
        (
            "LOW",
            json!({
                "Score": 27,
                "Result": "Pass",
                "Confidence": 93,
                "Comment": "No risk signals",
                "ComputedData": {
                    "Customer": {
                        "IsDisposableEmail": false,
                        "IsSuspiciousHistory": false,
                        "IsBadHistory": false
                    },
                    "Phone": {"IsPhoneRisky": false},
                    "Location": {"IsIPCountryDomestic": true},
                    "BlackList": {
                        "IsEmailDomainBlackListed": false,
                        "IsFullEmailAddressBlackListed": false,
                        "IsPostCodeBlackListed": false,
                        "IsIPBlackListed": false
                    }
                }
            }),
        )
    };

    let te_response = format!(
        "<TEResponse><ErrorCode>0</ErrorCode><TEvRisk>{risk}</TEvRisk>\
         <TrustevDetailedDecision>{detail}</TrustevDetailedDecision></TEResponse>"
    );
    Json(envelope(&te_response))
}

/// Look up a string-valued entry in the `Fields` sequence.
fn field_value<'a>(fields: &'a [Field], key: &str) -> Option<&'a str> {
    fields.iter().find(|f| f.key == key).and_then(|f| f.value.as_str())
}

/// Pull one leaf element's text out of a flat XML document. Good enough for a
/// mock; the client crate owns real parsing.
fn extract_element<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(&xml[start..end])
}

fn error_envelope(code: &str, text: &str) -> Value {
    envelope(&format!(
        "<TEResponse><ErrorCode>{code}</ErrorCode><ErrorText>{text}</ErrorText></TEResponse>"
    ))
}

fn envelope(te_response: &str) -> Value {
    json!({
        "ContextData": [
            {"Key": "CaseNumber", "Value": Uuid::new_v4().to_string()},
            {"Key": "TEResponse", "Value": te_response}
        ]
    })
}
