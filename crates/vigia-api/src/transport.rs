// Transport configuration for building reqwest::Client instances.
//
// The sensor API is usually reached through an ngrok-style tunnel with a
// valid certificate, but self-hosted deployments sometimes run behind a
// self-signed one, so the accept-invalid escape hatch stays configurable.

use std::time::Duration;

use reqwest::header::HeaderMap;

/// Transport settings shared by every request the client issues.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config with the given default
    /// headers (the tunnel-bypass header is injected here by the caller).
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, crate::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("vigia/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(crate::Error::Transport)
    }
}
