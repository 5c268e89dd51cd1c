//! Jivvy Server - HTTP API for concept matching and quiz tagging
//!
//! Exposes the `jivvy` tagging library to the rest of the study app:
//!
//! - **Normalization**: show how text is normalized before matching
//! - **Concept Matching**: whole-token matches of a concept list in one text
//! - **Quiz Tagging**: tag a batch of quiz questions with a shared concept list
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public Endpoints (No Authentication)
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Protected Endpoints (API Key Required)
//!
//! - `POST /api/v1/concepts/normalize` - Normalize text
//! - `POST /api/v1/concepts/match` - Match concepts in text
//! - `POST /api/v1/quiz/tag` - Tag quiz questions
//! - `GET /api/v1/metadata` - Server metadata

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
