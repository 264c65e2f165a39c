//! End-to-end submission tests against the live mock vendor.
//!
//! # Design
//! Starts the mock server on a random port, then drives full submissions over
//! real HTTP using ureq: build the outbound envelope, execute it, decode the
//! nested reply, read the typed accessors. Validates that request building and
//! response parsing work end-to-end against an actual server speaking the
//! vendor's wire format.

use trustev_core::{Applicant, CaseClient, CaseError, Config, HttpRequest, HttpResponse};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core client
/// handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut request = agent.post(&req.url);
    for (name, value) in &req.headers {
        request = request.header(name, value);
    }
    let mut response = request.send(req.body.as_bytes()).expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_vec().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_mock_vendor() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_vendor::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn applicant(email: &str) -> Applicant {
    Applicant {
        external_application_id: "APP-1042".to_string(),
        session_id: "9c1b2f6e".to_string(),
        first_name: "Ana".to_string(),
        last_name: "Martin".to_string(),
        email: email.to_string(),
        address_phone_number: "4165550199".to_string(),
        address: "12 King St W".to_string(),
        city: "Toronto".to_string(),
        province: "ON".to_string(),
        postal_code: "M5H 1A1".to_string(),
        previous_address: "8 Main St".to_string(),
        previous_city: "Ottawa".to_string(),
        previous_province: "ON".to_string(),
        previous_postal_code: "K1A 0A1".to_string(),
        employer_name: "Acme".to_string(),
        occupation: "Engineer".to_string(),
        birth_date: "01/09/1990".to_string(),
        sin_number: "000000000".to_string(),
    }
}

#[test]
fn case_submission_lifecycle() {
    let addr = start_mock_vendor();
    let url = format!("http://{addr}/case");

    // Step 1: a clean applicant scores LOW with no signals raised.
    let client = CaseClient::new(Config::new(&url, "user", "secret", "solution-1"));
    let req = client.build_case_request(&applicant("ana@example.com")).unwrap();
    let result = client.parse_case_response(execute(req)).unwrap();

    assert!(!result.error());
    assert_eq!(result.error_code(), "0");
    assert_eq!(result.risk().unwrap(), "LOW");
    assert_eq!(result.result().unwrap(), "Pass");
    assert_eq!(result.score().unwrap(), 27.0);
    assert_eq!(result.confidence().unwrap(), 93.0);
    assert_eq!(result.comment().unwrap(), "No risk signals");
    assert!(!result.is_phone_risky().unwrap());
    assert!(!result.is_disposable_email().unwrap());
    assert!(!result.is_ip_blacklisted().unwrap());
    assert!(result.is_ip_country_domestic().unwrap());

    // Step 2: a fraud-flagged applicant scores HIGH with signals raised.
    let req = client.build_case_request(&applicant("fraud@example.com")).unwrap();
    let result = client.parse_case_response(execute(req)).unwrap();

    assert!(!result.error());
    assert_eq!(result.risk().unwrap(), "HIGH");
    assert_eq!(result.result().unwrap(), "Fail");
    assert!(result.is_phone_risky().unwrap());
    assert!(result.is_disposable_email().unwrap());
    assert!(result.is_email_domain_blacklisted().unwrap());
    assert!(result.is_full_email_address_blacklisted().unwrap());
    assert!(result.is_ip_blacklisted().unwrap());
    assert!(result.is_suspicious_history().unwrap());
    assert!(result.is_bad_history().unwrap());

    // Step 3: bad credentials produce a vendor error; error fields stay
    // readable, decision fields do not.
    let unauthenticated = CaseClient::new(Config::new(&url, "", "", "solution-1"));
    let req = unauthenticated.build_case_request(&applicant("ana@example.com")).unwrap();
    let result = unauthenticated.parse_case_response(execute(req)).unwrap();

    assert!(result.error());
    assert_eq!(result.error_code(), "102");
    assert_eq!(result.error_text(), Some("Authentication failed"));
    assert!(matches!(result.risk(), Err(CaseError::DecisionUnavailable { .. })));
    assert!(matches!(result.score(), Err(CaseError::DecisionUnavailable { .. })));
    assert!(matches!(result.comment(), Err(CaseError::DecisionUnavailable { .. })));

    // Step 4: an empty solution set is rejected in-band as well.
    let misconfigured = CaseClient::new(Config::new(&url, "user", "secret", ""));
    let req = misconfigured.build_case_request(&applicant("ana@example.com")).unwrap();
    let result = misconfigured.parse_case_response(execute(req)).unwrap();
    assert!(result.error());
    assert_eq!(result.error_code(), "103");
}

#[test]
fn unknown_path_is_a_transport_error() {
    let addr = start_mock_vendor();
    let client = CaseClient::new(Config::new(
        &format!("http://{addr}/nowhere"),
        "user",
        "secret",
        "solution-1",
    ));
    let req = client.build_case_request(&applicant("ana@example.com")).unwrap();
    let err = client.parse_case_response(execute(req)).unwrap_err();
    assert!(matches!(err, CaseError::Transport { status: 404, .. }));
}
