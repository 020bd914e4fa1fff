//! # Fetch Jobs
//!
//! A fetch job is the orchestrator's record of one collection run: for each
//! enrolled device, the endpoints that were requested and what came back.
//!
//! ```json
//! {
//!   "projectId": "study-01",
//!   "date": "2024-03-01",
//!   "devices": [{
//!     "deviceId": "d-1",
//!     "user_id": "ABC123",
//!     "participantUid": "p-1",
//!     "endpoints": [{
//!       "request": {"sensor": "HRV Summary by Date", "endpointUrl": "..."},
//!       "response": {"status": 200, "data": {"hrv": []}}
//!     }]
//!   }]
//! }
//! ```
//!
//! Endpoints are classified in parallel and merged back in job order, so the
//! combined payload is the same as a sequential walk would produce.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::Pipeline;
use crate::report::{BatchReport, Summary};
use crate::rows::TableRows;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

const HTTP_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchJob {
    pub project_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub devices: Vec<DeviceFetch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFetch {
    #[serde(default)]
    pub device_id: Option<String>,
    /// Fitbit user id the rows are keyed by
    #[serde(rename = "user_id", default)]
    pub user_id: String,
    #[serde(default)]
    pub participant_uid: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<EndpointFetch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointFetch {
    pub request: EndpointRequest,
    pub response: EndpointResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRequest {
    /// Endpoint label, e.g. `"Sleep Log by Date"`
    pub sensor: String,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointResponse {
    pub status: u16,
    #[serde(default)]
    pub data: Value,
}

impl FetchJob {
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn endpoint_count(&self) -> usize {
        self.devices.iter().map(|d| d.endpoints.len()).sum()
    }
}

/// Why an endpoint contributed no rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// Upstream answered with a non-200 status
    HttpStatus(u16),
    /// The classifier produced no tables (unknown label or unusable payload)
    Unclassified,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HttpStatus(status) => write!(f, "HTTP_STATUS {status}"),
            SkipReason::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEndpoint {
    pub device_id: Option<String>,
    pub user_id: String,
    pub sensor: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of processing one fetch job
#[derive(Debug, Clone, Serialize)]
pub struct FetchJobReport {
    pub project_id: String,
    pub date: String,
    /// Endpoints whose rows reached validation
    pub endpoints_processed: usize,
    pub skipped: Vec<SkippedEndpoint>,
    pub batch: BatchReport,
}

impl FetchJobReport {
    pub fn summary(&self) -> Summary {
        self.batch.summary()
    }
}

enum EndpointOutcome {
    Rows(TableRows),
    Skipped(SkippedEndpoint),
}

impl Pipeline {
    /// Classify every endpoint of a fetch job, concatenate rows per table and
    /// validate the combined payload once.
    pub fn process_fetch_job(&self, job: &FetchJob) -> PipelineResult<FetchJobReport> {
        if job.devices.is_empty() {
            return Err(PipelineError::EmptyFetchJob(job.project_id.clone()));
        }

        let work: Vec<(&DeviceFetch, &EndpointFetch)> = job
            .devices
            .iter()
            .flat_map(|device| device.endpoints.iter().map(move |endpoint| (device, endpoint)))
            .collect();

        let outcomes: Vec<EndpointOutcome> = self.install(|| {
            work.par_iter()
                .map(|(device, endpoint)| self.classify_endpoint(device, endpoint))
                .collect()
        });

        let mut payload = TableRows::new();
        let mut skipped = Vec::new();
        let mut endpoints_processed = 0;
        for outcome in outcomes {
            match outcome {
                EndpointOutcome::Rows(rows) => {
                    endpoints_processed += 1;
                    payload.merge(rows);
                }
                EndpointOutcome::Skipped(skip) => {
                    warn!(
                        project = %job.project_id,
                        sensor = %skip.sensor,
                        user_id = %skip.user_id,
                        reason = %skip.reason,
                        "fetch_job_endpoint_skipped"
                    );
                    skipped.push(skip);
                }
            }
        }

        let batch = self.validate_payload(&payload);
        info!(
            project = %job.project_id,
            date = %job.date,
            devices = job.devices.len(),
            processed = endpoints_processed,
            skipped = skipped.len(),
            "fetch_job_processed"
        );

        Ok(FetchJobReport {
            project_id: job.project_id.clone(),
            date: job.date.clone(),
            endpoints_processed,
            skipped,
            batch,
        })
    }

    fn classify_endpoint(&self, device: &DeviceFetch, endpoint: &EndpointFetch) -> EndpointOutcome {
        let skip = |reason| {
            EndpointOutcome::Skipped(SkippedEndpoint {
                device_id: device.device_id.clone(),
                user_id: device.user_id.clone(),
                sensor: endpoint.request.sensor.clone(),
                reason,
            })
        };

        if endpoint.response.status != HTTP_OK {
            return skip(SkipReason::HttpStatus(endpoint.response.status));
        }

        let rows = self.classify(&endpoint.request.sensor, &endpoint.response.data, &device.user_id);
        if rows.is_empty() {
            skip(SkipReason::Unclassified)
        } else {
            EndpointOutcome::Rows(rows)
        }
    }
}
