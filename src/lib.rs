//! # Wearable Ingest
//!
//! Normalizes wearable-device API payloads into flat table rows and checks
//! every row against a declarative column catalog before storage.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Endpoint label + raw JSON payload + user id
//!     ↓
//! [Classifier]          → TableRows (table name → candidate rows)
//!     ↓
//! [RowValidator]        → RowReport per row (field outcomes + corrected row)
//!     ↓
//! [Report Aggregator]   → TableReport per table → BatchReport
//!     ↓
//! Summary (success / warning / error counts + corrected payload)
//! ```
//!
//! ### Fetch jobs
//! ```text
//! FetchJob
//!     ├── Devices (user id each)
//!     │     └── Endpoints (request label, response status + data)
//!     ├── Parallel classification (Rayon), merged in job order
//!     └── One validation pass over the combined payload
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wearable_ingest::{Config, Pipeline};
//!
//! let config = Config::load()?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! let payload = serde_json::json!({
//!     "hrv": [{"dateTime": "2024-03-01", "value": {"dailyRmssd": 34.5, "deepRmssd": 30.1}}]
//! });
//! let summary = pipeline
//!     .classify_and_validate("HRV Summary by Date", &payload, "ABC123")
//!     .summary();
//!
//! assert_eq!(summary.errors, 0);
//! let rows = summary.corrected_payload.get("hrv_summary");
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `schema` | Column types, table schemas, registry, row validator |
//! | `classifier` | Label dispatch and payload flattening |
//! | `report` | Per-table and per-batch outcome aggregation |
//! | `pipeline` | Classifier + registry + validator wiring |
//! | `fetch_job` | Orchestrator fetch-job traversal |
//! | `config` | Hierarchical configuration |

pub mod classifier;
pub mod config;
pub mod error;
pub mod fetch_job;
pub mod pipeline;
pub mod report;
pub mod rows;
pub mod schema;

pub use classifier::{Classifier, EndpointKind};
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use fetch_job::{FetchJob, FetchJobReport};
pub use pipeline::Pipeline;
pub use report::{BatchReport, Summary, TableReport};
pub use rows::{CandidateRow, TableRows};
pub use schema::{
    check_field, ColumnDefinition, ColumnMode, ErrorKind, FieldOutcome, RowReport, RowValidator,
    SchemaError, SchemaRegistry, SemanticType, TableSchema,
};
