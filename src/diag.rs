//! Diagnostic driver: exercise the backend manually and watch what happens.
//!
//! The driver sequences the pipeline the way an operator checking a freshly
//! deployed backend would — warm-up first, then an ingest + parse round trip
//! on a sample drawing — and reports every step to a [`StatusSink`], the
//! display surface. The sink keeps the driver display-agnostic: the CLI
//! prints lines, a test records them, a service could push them to a
//! websocket.
//!
//! There is no retry at this layer. Each step's error aborts the sequence
//! and is displayed verbatim; a successful ingest before a failed parse is
//! not rolled back. Concurrent driver invocations sharing one sink are not
//! serialized — the last writer wins.

use crate::client::Draw2GlbClient;
use crate::error::ClientError;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Receives human-readable status lines from the diagnostic driver.
///
/// Implementations must be `Send + Sync`; the driver itself calls the sink
/// sequentially, but callers may share one sink across invocations.
pub trait StatusSink: Send + Sync {
    /// Display a status line, replacing whatever was shown before.
    fn status(&self, line: &str);
}

/// A no-op sink for callers that only care about the returned `Result`.
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
    fn status(&self, _line: &str) {}
}

/// Convenience alias for a shared sink.
pub type SharedStatusSink = Arc<dyn StatusSink>;

/// Warm the backend up, reporting progress and the final outcome.
pub async fn run_warmup(
    client: &Draw2GlbClient,
    sink: &dyn StatusSink,
) -> Result<(), ClientError> {
    sink.status("Warming up…");
    match client.warmup().await {
        Ok(()) => {
            sink.status("Warmup OK");
            Ok(())
        }
        Err(e) => {
            sink.status(&format!("Warmup ERROR: {e}"));
            Err(e)
        }
    }
}

/// Ingest a drawing and parse it, reporting each step.
///
/// On success returns the backend-assigned identifier together with the
/// parse result; the sink has already been shown both.
pub async fn run_ingest_parse(
    client: &Draw2GlbClient,
    file_name: &str,
    bytes: Vec<u8>,
    sink: &dyn StatusSink,
) -> Result<(String, Value), ClientError> {
    sink.status("Ingesting…");
    let file_id = match client.ingest(file_name, bytes).await {
        Ok(id) => id,
        Err(e) => {
            sink.status(&format!("Ingest/Parse ERROR: {e}"));
            return Err(e);
        }
    };

    debug!(file_id = %file_id, "ingest step done");
    sink.status(&format!("Parsing… (file_id={file_id})"));
    let parsed = match client.parse(&file_id).await {
        Ok(v) => v,
        Err(e) => {
            sink.status(&format!("Ingest/Parse ERROR: {e}"));
            return Err(e);
        }
    };

    let rendered =
        serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| parsed.to_string());
    sink.status(&format!("Parsed OK:\n{rendered}"));
    Ok((file_id, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::sync::Mutex;

    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                lines: Mutex::new(Vec::new()),
            }
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl StatusSink for RecordingSink {
        fn status(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    fn unreachable_client() -> Draw2GlbClient {
        // Nothing listens on port 9; connections are refused immediately.
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        Draw2GlbClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn warmup_failure_is_reported_to_the_sink() {
        let sink = RecordingSink::new();
        let result = run_warmup(&unreachable_client(), &sink).await;

        assert!(result.is_err());
        let lines = sink.lines();
        assert_eq!(lines[0], "Warming up…");
        assert!(
            lines.last().unwrap().starts_with("Warmup ERROR:"),
            "got: {lines:?}"
        );
    }

    #[tokio::test]
    async fn ingest_failure_aborts_before_parse() {
        let sink = RecordingSink::new();
        let result =
            run_ingest_parse(&unreachable_client(), "a.pdf", b"%PDF".to_vec(), &sink).await;

        assert!(result.is_err());
        let lines = sink.lines();
        assert_eq!(lines[0], "Ingesting…");
        assert!(lines.iter().all(|l| !l.starts_with("Parsing…")));
        assert!(lines.last().unwrap().starts_with("Ingest/Parse ERROR:"));
    }

    #[test]
    fn noop_sink_does_not_panic() {
        NoopStatusSink.status("anything");
    }
}
