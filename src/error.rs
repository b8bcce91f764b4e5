//! Error types for the draw2glb-client library.
//!
//! One flat [`ClientError`] enum covers the four failure classes a backend
//! call can hit:
//!
//! * **Configuration** — the base URL was never set. Fatal, surfaced before
//!   any request is made.
//! * **Transport** — the endpoint could not be reached, or the request
//!   exceeded its timeout. Only the warm-up path has a recovery behaviour
//!   (one fallback health check); everything else surfaces it immediately.
//! * **Protocol** — the backend answered with a non-2xx status. The message
//!   always carries the numeric status code and, where retrievable, the
//!   response body text. Never retried.
//! * **Contract violation** — a 2xx response whose body is missing what the
//!   backend promised (no `file_id`, undecodable JSON). Distinct variants so
//!   callers can tell "the backend is broken" from "the backend is down".

use thiserror::Error;

/// All errors returned by the draw2glb-client library.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Configuration errors ─────────────────────────────────────────────
    /// No base URL configured.
    #[error("API base URL missing\nSet DRAW2GLB_API_BASE_URL or pass one to ClientConfig::builder().")]
    MissingBaseUrl,

    // ── Transport errors ─────────────────────────────────────────────────
    /// The endpoint could not be reached at all.
    #[error("{op}: request failed: {reason}")]
    Transport { op: &'static str, reason: String },

    /// The request exceeded its time bound.
    #[error("{op}: timed out after {secs}s")]
    Timeout { op: &'static str, secs: u64 },

    // ── Protocol errors ──────────────────────────────────────────────────
    /// The backend answered with a non-successful HTTP status.
    #[error("{op}: HTTP {status}{}", fmt_body(.body))]
    Status {
        op: &'static str,
        status: u16,
        body: String,
    },

    /// Warm-up failed on both the command endpoint and the health fallback.
    #[error("warmup failed: {detail}")]
    WarmupFailed { detail: String },

    // ── Contract violations ──────────────────────────────────────────────
    /// Ingest returned a successful status but no `file_id` field.
    #[error("ingest: response is missing file_id")]
    MissingFileId,

    /// The caller passed an empty file identifier to parse.
    #[error("parse: file_id must not be empty")]
    EmptyFileId,

    /// A successful response whose body could not be decoded.
    #[error("{op}: invalid response body: {detail}")]
    InvalidResponse { op: &'static str, detail: String },
}

fn fmt_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_contains_code_and_body() {
        let e = ClientError::Status {
            op: "ingest",
            status: 500,
            body: "boom".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("500"), "got: {msg}");
        assert!(msg.contains("boom"), "got: {msg}");
    }

    #[test]
    fn status_display_without_body() {
        let e = ClientError::Status {
            op: "build",
            status: 502,
            body: String::new(),
        };
        assert_eq!(e.to_string(), "build: HTTP 502");
    }

    #[test]
    fn missing_file_id_is_distinct_from_invalid_json() {
        let missing = ClientError::MissingFileId;
        assert!(missing.to_string().contains("file_id"));

        let invalid = ClientError::InvalidResponse {
            op: "ingest",
            detail: "expected value at line 1".into(),
        };
        assert!(invalid.to_string().contains("invalid response"));
    }

    #[test]
    fn timeout_display() {
        let e = ClientError::Timeout {
            op: "warmup",
            secs: 20,
        };
        assert!(e.to_string().contains("20s"));
    }
}
