//! # draw2glb-client
//!
//! Client for the draw2glb backend: upload a technical drawing (PDF/PNG/JPG),
//! have its dimensions and features extracted, and build a GLB model from a
//! specification.
//!
//! ## Pipeline Overview
//!
//! ```text
//! drawing.pdf
//!  │
//!  ├─ 1. Warmup  POST /warmup (fallback GET /health) — wake a cold backend
//!  ├─ 2. Ingest  POST /ingest  multipart upload      → file_id
//!  ├─ 3. Parse   POST /parse   {"file_id": …}        → dims/features JSON
//!  └─ 4. Build   POST /build   model spec JSON       → model.glb bytes
//! ```
//!
//! Each step is one HTTP exchange; the crate owns no protocol beyond that.
//! Parse results and build specs are deliberately left as
//! [`serde_json::Value`] — their schema belongs to the backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use draw2glb_client::{ClientConfig, Draw2GlbClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads DRAW2GLB_API_BASE_URL and DRAW2GLB_API_KEY
//!     let config = ClientConfig::from_env()?;
//!     let client = Draw2GlbClient::new(config)?;
//!
//!     client.warmup().await?;
//!     let file_id = client.ingest("bracket.pdf", std::fs::read("bracket.pdf")?).await?;
//!     let parsed = client.parse(&file_id).await?;
//!     println!("{}", serde_json::to_string_pretty(&parsed)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `draw2glb` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! draw2glb-client = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod diag;
pub mod error;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{Draw2GlbClient, WARMUP_TIMEOUT_SECS};
pub use config::{ClientConfig, ClientConfigBuilder, ENV_API_KEY, ENV_BASE_URL};
pub use diag::{run_ingest_parse, run_warmup, NoopStatusSink, SharedStatusSink, StatusSink};
pub use error::ClientError;
