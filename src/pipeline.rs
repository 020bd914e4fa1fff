//! # Pipeline
//!
//! Wires the classifier, the schema registry and the row validator together.
//!
//! ```text
//! label + payload + user id
//!        │
//!        ▼
//!   Classifier::classify ──► TableRows
//!        │
//!        ▼
//!   RowValidator::validate_payload ──► BatchReport ──► Summary
//! ```
//!
//! A `Pipeline` is immutable once built and can be shared across threads.

use crate::classifier::Classifier;
use crate::config::{Config, ValidationConfig};
use crate::error::PipelineResult;
use crate::report::BatchReport;
use crate::rows::TableRows;
use crate::schema::{RowValidator, SchemaRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<SchemaRegistry>,
    classifier: Classifier,
    validation: ValidationConfig,
    /// Dedicated pool for fetch-job fan-out; `None` uses rayon's global pool
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Pipeline {
    pub fn new(registry: Arc<SchemaRegistry>, classifier: Classifier, validation: ValidationConfig) -> Self {
        Pipeline {
            registry,
            classifier,
            validation,
            pool: None,
        }
    }

    /// Build from configuration: catalog file or built-in registry,
    /// classifier reference date, validation policy and worker count.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let registry = match &config.schema.catalog_path {
            Some(path) => Arc::new(SchemaRegistry::from_catalog_file(path)?),
            None => SchemaRegistry::builtin(),
        };
        let classifier = Classifier::from_config(&config.classifier);

        info!(
            catalog_version = %registry.version(),
            tables = registry.len(),
            reference_date = %classifier.reference_date(),
            missing_required = ?config.validation.missing_required,
            enforce_types = config.validation.enforce_types,
            "pipeline_initialized"
        );

        Pipeline::new(registry, classifier, config.validation).with_threads(config.ingest.num_threads)
    }

    /// Use a dedicated pool of `num_threads` workers (0 keeps the global pool)
    pub fn with_threads(mut self, num_threads: usize) -> PipelineResult<Self> {
        self.pool = if num_threads == 0 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("ingest-worker-{i}"))
                .build()?;
            Some(Arc::new(pool))
        };
        Ok(self)
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn validation(&self) -> ValidationConfig {
        self.validation
    }

    pub fn validator(&self) -> RowValidator<'_> {
        RowValidator::new(&self.registry, self.validation)
    }

    pub fn classify(&self, label: &str, payload: &Value, user_id: &str) -> TableRows {
        self.classifier.classify(label, payload, user_id)
    }

    pub fn validate_payload(&self, payload: &TableRows) -> BatchReport {
        self.validator().validate_payload(payload)
    }

    /// Classify one payload and validate the resulting rows
    pub fn classify_and_validate(&self, label: &str, payload: &Value, user_id: &str) -> BatchReport {
        let rows = self.classify(label, payload, user_id);
        debug!(label = %label, tables = rows.table_count(), rows = rows.row_count(), "rows_classified");
        self.validate_payload(&rows)
    }

    /// Run `op` inside the dedicated pool when one is configured
    pub(crate) fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingRequiredPolicy;
    use chrono::NaiveDate;
    use serde_json::json;

    fn pipeline() -> Pipeline {
        Pipeline::new(
            SchemaRegistry::builtin(),
            Classifier::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            ValidationConfig::default(),
        )
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[test]
    fn test_classify_and_validate_clean_payload() {
        let payload = json!({"hrv": [{"dateTime": "2024-02-29", "value": {"dailyRmssd": 34.5, "deepRmssd": 30.1}}]});
        let batch = pipeline().classify_and_validate("HRV Summary by Date", &payload, "u1");

        assert_eq!(batch.error_count, 0);
        assert_eq!(batch.warning_count, 0);
        assert_eq!(batch.success_count, 4);
        let summary = batch.summary();
        let row = &summary.corrected_payload.get("hrv_summary").unwrap()[0];
        assert_eq!(row["daily_rmssd"], json!(34.5));
    }

    #[test]
    fn test_classify_and_validate_unknown_label() {
        let batch = pipeline().classify_and_validate("Food Log", &json!({"foods": []}), "u1");
        assert!(batch.is_empty());
        assert_eq!(batch.summary().corrected_payload.table_count(), 0);
    }

    #[test]
    fn test_from_config_defaults() {
        let mut config = Config::default();
        config.classifier.reference_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        config.validation.missing_required = MissingRequiredPolicy::Reject;

        let pipeline = Pipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.registry().version(), crate::schema::builtin::CATALOG_VERSION);
        assert_eq!(pipeline.validation().missing_required, MissingRequiredPolicy::Reject);
        assert_eq!(
            pipeline.classifier().reference_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_with_threads() {
        let pipeline = pipeline().with_threads(2).unwrap();
        assert_eq!(pipeline.install(|| rayon::current_num_threads()), 2);
    }
}
