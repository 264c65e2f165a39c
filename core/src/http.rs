//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP traffic as plain data. The core crate builds
//! `HttpRequest` values and parses `HttpResponse` values without ever touching
//! the network — the caller (host) is responsible for executing the actual
//! I/O. The vendor API is a single POST endpoint, so the request carries no
//! method field: every `HttpRequest` is executed as a POST.
//!
//! The response body is raw bytes rather than text. The vendor historically
//! emitted Windows-1252 bytes inside an otherwise-JSON body, so text
//! interpretation (including the opt-in repair pre-pass) belongs to the
//! decoder, not the transport.

/// An HTTP POST request described as plain data.
///
/// Built by `CaseClient::build_case_request`. The caller executes it against
/// the network and returns the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed to
/// `CaseClient::parse_case_response` for decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}
