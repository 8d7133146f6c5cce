// Hand-crafted async HTTP client for the PIR sensor API.
//
// Base path: /api/
// No auth; every request carries the tunnel-bypass header so ngrok-style
// proxies return JSON instead of an interstitial warning page.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::envelope::{self, Payload};
use crate::types::{HealthReport, MovementPage, RawMovement, RawStats, RegisterReceipt};
use crate::{Error, TransportConfig};

/// Header that tells ngrok-style tunnels to skip the browser warning page.
pub const TUNNEL_BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

// ── Failure body shape ───────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the motion-sensor REST API.
///
/// Stateless JSON over HTTP under `/api/`. The client never retries;
/// retry cadence belongs to the pollers that own the timers.
pub struct SensorClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl SensorClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the API at `base_url` (with or without a
    /// trailing `/api` segment).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(TUNNEL_BYPASS_HEADER, HeaderValue::from_static("1"));

        let http = transport.build_client(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Build the base URL so it always ends with `/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"movimientos"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    /// Dispatch a request, splitting timeouts out of the transport error.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    async fn get_payload(&self, path: &str) -> Result<Payload, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        Self::handle_response(resp).await
    }

    async fn get_payload_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Payload, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        Self::handle_response(resp).await
    }

    async fn post_payload<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Payload, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(resp: reqwest::Response) -> Result<Payload, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            let value: Value = serde_json::from_str(&body).map_err(|e| Error::Decode {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            })?;
            envelope::normalize(value)
        } else {
            Err(Self::failure_from(status, resp).await)
        }
    }

    async fn failure_from(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<FailureBody>(&raw)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    preview(&raw)
                }
            });

        Error::Http {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Aggregate counters: total, today, this week, last motion.
    pub async fn stats(&self) -> Result<RawStats, Error> {
        let payload = self.get_payload("estadisticas").await?;
        decode(payload.data)
    }

    /// One page of motion records, newest-first. Pages are 1-based.
    pub async fn movements(&self, page: u32, limit: u32) -> Result<MovementPage, Error> {
        let payload = self
            .get_payload_with_params(
                "movimientos",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        let movements = decode(payload.data)?;
        Ok(MovementPage {
            movements,
            pagination: payload.pagination,
        })
    }

    /// Look up a single motion record by id.
    pub async fn movement(&self, id: u64) -> Result<RawMovement, Error> {
        let payload = self.get_payload(&format!("movimiento/{id}")).await?;
        decode(payload.data)
    }

    /// Register a motion event. This is the sensor-side write path; the
    /// dashboard read path never calls it.
    pub async fn register(&self, description: &str) -> Result<RegisterReceipt, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            descripcion: &'a str,
        }

        let payload = self
            .post_payload(
                "movimiento",
                &Body {
                    descripcion: description,
                },
            )
            .await?;
        decode(payload.data)
    }

    /// Probe upstream API + database health.
    pub async fn health(&self) -> Result<HealthReport, Error> {
        let payload = self.get_payload("health").await?;
        decode(payload.data)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Deserialize a normalized payload, keeping the raw body for diagnostics.
fn decode<T: DeserializeOwned>(data: Value) -> Result<T, Error> {
    let body = data.to_string();
    serde_json::from_value(data).map_err(|e| Error::Decode {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// First 200 chars of a body for error messages (multi-byte safe).
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
