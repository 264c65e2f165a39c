//! Client configuration.
//!
//! # Design
//! A plain value passed to `CaseClient::new` — no process-wide singleton.
//! Constructed once at startup and cloned wherever needed; the client never
//! mutates it.

/// Credentials and switches for the vendor endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full URL of the on-demand scoring endpoint.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Vendor-side identifier selecting which scoring ruleset to apply.
    pub solution_set_id: String,
    /// Selects the `messageType` discriminator: `"P"` when true, `"T"` otherwise.
    pub production: bool,
    /// Reinterpret response bytes as Windows-1252 before JSON parsing.
    ///
    /// The vendor historically emitted Windows-1252 bytes in its replies.
    /// Leave this off unless mojibake is actually observed: applying the
    /// repair to valid UTF-8 corrupts multi-byte sequences.
    pub repair_legacy_encoding: bool,
}

impl Config {
    pub fn new(url: &str, username: &str, password: &str, solution_set_id: &str) -> Self {
        Self {
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            solution_set_id: solution_set_id.to_string(),
            production: false,
            repair_legacy_encoding: false,
        }
    }

    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn repair_legacy_encoding(mut self, repair: bool) -> Self {
        self.repair_legacy_encoding = repair;
        self
    }
}
