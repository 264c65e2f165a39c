//! Error types for the Trustev case client.
//!
//! # Design
//! Three conditions callers handle differently get their own variants:
//! transport failures are propagated uninterpreted, a reply that does not
//! match the nested envelope shape fails at decode time, and reading a
//! decision field the vendor withheld is an expected condition callers avoid
//! by checking `CaseResult::error()` first.

use std::fmt;

/// Errors returned by `CaseClient` and the envelope decoder.
#[derive(Debug)]
pub enum CaseError {
    /// The vendor returned a non-2xx status. The body is passed through
    /// untouched for debugging; nothing in it is interpreted.
    Transport { status: u16, body: String },

    /// The response body did not conform to the expected nested
    /// JSON / key-value / XML / JSON shape.
    MalformedEnvelope(String),

    /// A decision-dependent field was read from a response whose vendor
    /// error code indicates failure, or which omitted the field. Callers
    /// should check `CaseResult::error()` before reading decision fields.
    DecisionUnavailable { field: &'static str },

    /// The outbound payload could not be serialized to JSON.
    Serialization(String),
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Transport { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            CaseError::MalformedEnvelope(msg) => {
                write!(f, "malformed response envelope: {msg}")
            }
            CaseError::DecisionUnavailable { field } => {
                write!(f, "field {field} not returned by the vendor")
            }
            CaseError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for CaseError {}
