//! The backend client: warm-up plus the ingest → parse → build pipeline.
//!
//! ## Call sequence
//!
//! ```text
//! warmup   POST /warmup   (fallback: GET /health)   service is awake
//! ingest   POST /ingest   multipart file            → file_id
//! parse    POST /parse    {"file_id": …}            → dims/features JSON
//! build    POST /build    model spec JSON           → GLB bytes
//! ```
//!
//! All four operations go through one request helper that joins the URL and
//! injects the bearer credential, so auth behaviour cannot drift between
//! endpoints. Parse results and build specs stay [`serde_json::Value`] on
//! purpose: their schema belongs to the backend, and typing them here would
//! couple this crate to a contract it does not own.
//!
//! ## Warm-up contract
//!
//! One `POST /warmup` command. A reachable endpoint answering non-2xx is an
//! immediate error — the service is up and refusing, retrying will not
//! change its mind. Only when the command endpoint is unreachable at the
//! transport level does the client fall back to a single `GET /health`;
//! a 2xx there means the service is awake even if it predates the warm-up
//! command. The outcome is always either ready or a descriptive error.

use crate::config::ClientConfig;
use crate::error::ClientError;
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on each warm-up round trip, in seconds.
///
/// A cold backend that takes longer than this to answer its own health
/// endpoint is not going to be usable for the pipeline either.
pub const WARMUP_TIMEOUT_SECS: u64 = 20;

/// Response bodies quoted in error messages are capped at this many bytes.
const ERROR_BODY_CAP: usize = 512;

/// Client for the draw2glb backend.
///
/// Holds one [`reqwest::Client`] (connection pool) and the immutable
/// [`ClientConfig`]. Cheap to clone; safe to share across tasks.
///
/// # Example
/// ```rust,no_run
/// use draw2glb_client::{ClientConfig, Draw2GlbClient};
///
/// # async fn run() -> Result<(), draw2glb_client::ClientError> {
/// let config = ClientConfig::from_env()?;
/// let client = Draw2GlbClient::new(config)?;
/// client.warmup().await?;
/// let file_id = client.ingest("bracket.pdf", std::fs::read("bracket.pdf").unwrap()).await?;
/// let parsed = client.parse(&file_id).await?;
/// println!("{parsed}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Draw2GlbClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Draw2GlbClient {
    /// Create a client from a validated configuration.
    ///
    /// Fails with [`ClientError::MissingBaseUrl`] when the config carries no
    /// base URL — no operation may proceed without one.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.is_empty() {
            return Err(ClientError::MissingBaseUrl);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ClientError::Transport {
            op: "client",
            reason: e.to_string(),
        })?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request for `method endpoint(path)` with the bearer
    /// credential injected when one is configured.
    ///
    /// Headers set by the operation afterwards (JSON content-type, multipart
    /// boundary) are applied on top of these defaults, so on a conflicting
    /// key the operation wins.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut rb = self.http.request(method, self.config.endpoint(path));
        if let Some(key) = self.config.bearer() {
            rb = rb.bearer_auth(key);
        }
        rb
    }

    /// Wake the backend: `POST /warmup`, falling back to `GET /health`.
    pub async fn warmup(&self) -> Result<(), ClientError> {
        let command = self
            .request(Method::POST, "/warmup")
            .timeout(Duration::from_secs(WARMUP_TIMEOUT_SECS))
            .send()
            .await;

        match command {
            Ok(resp) if resp.status().is_success() => {
                info!("warmup command accepted");
                Ok(())
            }
            // Reachable but refusing: surface immediately, no fallback.
            Ok(resp) => Err(status_error("warmup", resp).await),
            Err(cmd_err) => {
                let cmd_err = send_error("warmup", cmd_err, WARMUP_TIMEOUT_SECS);
                warn!("warmup command unreachable ({cmd_err}); trying health check");

                let health = self
                    .request(Method::GET, "/health")
                    .timeout(Duration::from_secs(WARMUP_TIMEOUT_SECS))
                    .send()
                    .await;

                match health {
                    Ok(resp) if resp.status().is_success() => {
                        info!("health check passed; backend is awake");
                        Ok(())
                    }
                    Ok(resp) => Err(ClientError::WarmupFailed {
                        detail: format!(
                            "{cmd_err}; health check returned HTTP {}",
                            resp.status().as_u16()
                        ),
                    }),
                    Err(health_err) => Err(ClientError::WarmupFailed {
                        detail: format!("{cmd_err}; health check failed: {health_err}"),
                    }),
                }
            }
        }
    }

    /// Upload a drawing and return its backend-assigned identifier.
    ///
    /// The backend accepts PDF/PNG/JPG; this client does not validate the
    /// content type — that restriction is the caller's. The multipart part
    /// carries the filename and a MIME type guessed from its extension so
    /// the backend can keep the extension on its side.
    pub async fn ingest(
        &self,
        file_name: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<String, ClientError> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(bytes.into())
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| ClientError::Transport {
                op: "ingest",
                reason: format!("invalid multipart form: {e}"),
            })?;
        let form = multipart::Form::new().part("file", part);

        debug!(file_name, mime = %mime, "uploading file");
        let resp = self
            .request(Method::POST, "/ingest")
            .multipart(form)
            .send()
            .await
            .map_err(|e| send_error("ingest", e, self.config.timeout_secs.unwrap_or(0)))?;

        if !resp.status().is_success() {
            return Err(status_error("ingest", resp).await);
        }

        let body: Value = resp.json().await.map_err(|e| ClientError::InvalidResponse {
            op: "ingest",
            detail: e.to_string(),
        })?;

        match body.get("file_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                info!(file_id = id, "file ingested");
                Ok(id.to_string())
            }
            _ => Err(ClientError::MissingFileId),
        }
    }

    /// Request structural extraction for a previously ingested file.
    ///
    /// Returns the backend's JSON body opaquely (dims, proposed features,
    /// confidence — whatever the backend version sends).
    pub async fn parse(&self, file_id: &str) -> Result<Value, ClientError> {
        if file_id.trim().is_empty() {
            return Err(ClientError::EmptyFileId);
        }

        let resp = self
            .request(Method::POST, "/parse")
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await
            .map_err(|e| send_error("parse", e, self.config.timeout_secs.unwrap_or(0)))?;

        if !resp.status().is_success() {
            return Err(status_error("parse", resp).await);
        }

        resp.json().await.map_err(|e| ClientError::InvalidResponse {
            op: "parse",
            detail: e.to_string(),
        })
    }

    /// Build a GLB artifact from a model specification.
    ///
    /// The spec is serialised as-is; the response bytes come back exactly
    /// as the backend produced them.
    pub async fn build(&self, spec: &Value) -> Result<Bytes, ClientError> {
        let resp = self
            .request(Method::POST, "/build")
            .json(spec)
            .send()
            .await
            .map_err(|e| send_error("build", e, self.config.timeout_secs.unwrap_or(0)))?;

        if !resp.status().is_success() {
            return Err(status_error("build", resp).await);
        }

        let bytes = resp.bytes().await.map_err(|e| ClientError::Transport {
            op: "build",
            reason: format!("failed to read artifact body: {e}"),
        })?;
        info!(len = bytes.len(), "artifact received");
        Ok(bytes)
    }
}

/// Map a `reqwest` send failure to the transport/timeout taxonomy.
fn send_error(op: &'static str, e: reqwest::Error, secs: u64) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout { op, secs }
    } else {
        ClientError::Transport {
            op,
            reason: e.to_string(),
        }
    }
}

/// Turn a non-2xx response into a status error, reading what body text is
/// retrievable.
async fn status_error(op: &'static str, resp: reqwest::Response) -> ClientError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Status {
        op,
        status,
        body: cap_body(body.trim()),
    }
}

/// Cap a quoted body at [`ERROR_BODY_CAP`] bytes on a char boundary.
fn cap_body(body: &str) -> String {
    if body.len() <= ERROR_BODY_CAP {
        return body.to_string();
    }
    let mut end = ERROR_BODY_CAP;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn client_requires_base_url() {
        let err = Draw2GlbClient::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::MissingBaseUrl));
    }

    #[test]
    fn cap_body_keeps_short_bodies_intact() {
        assert_eq!(cap_body("detail"), "detail");
    }

    #[test]
    fn cap_body_truncates_on_char_boundary() {
        let long = "é".repeat(ERROR_BODY_CAP); // 2 bytes per char
        let capped = cap_body(&long);
        assert!(capped.len() <= ERROR_BODY_CAP + '\u{2026}'.len_utf8());
        assert!(capped.ends_with('\u{2026}'));
    }
}
