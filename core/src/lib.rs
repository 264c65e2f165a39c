//! Synchronous client core for the Trustev on-demand case scoring API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `CaseClient` is stateless — it holds only the injected `Config`.
//! - Submission is split into `build_case_request` (produces the outbound
//!   envelope) and `parse_case_response` (decodes the nested reply), so the
//!   I/O boundary is explicit.
//! - The vendor reply nests three encodings: JSON, a `{Key,Value}` array, and
//!   an embedded XML document whose `TrustevDetailedDecision` field is itself
//!   a JSON string. `envelope::decode_envelope` reverses all three.
//! - `parse_case_response` extracts a typed `TeResponse` eagerly, so
//!   `CaseResult` accessors are plain field reads — a malformed reply surfaces
//!   as `MalformedEnvelope` at parse time, never at accessor time.

pub mod applicant;
pub mod case;
pub mod config;
pub mod decision;
pub mod envelope;
pub mod error;
pub mod http;
pub mod xml;

pub use applicant::Applicant;
pub use case::{CaseClient, CaseResult, SUCCESS_ERROR_CODE};
pub use config::Config;
pub use decision::{ComputedData, DetailedDecision, TeResponse};
pub use envelope::{decode_envelope, decode_envelope_bytes, KeyValuePair};
pub use error::CaseError;
pub use http::{HttpRequest, HttpResponse};
