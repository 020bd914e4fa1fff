//! # Shape Classifier & Normalizer
//!
//! Turns one raw endpoint payload into flat candidate rows keyed by
//! destination table.
//!
//! ## Dispatch
//!
//! The endpoint label is lower-cased and matched against [`DISPATCH`], an
//! ordered list of substring rules. The first rule that matches picks the
//! [`EndpointKind`], and the kind picks its handler. Labels that share
//! substrings ("sleep log by date range" / "sleep log by date") are listed
//! most specific first.
//!
//! ## Failure model
//!
//! Classification never fails loudly. An unknown label, an empty user id or
//! a payload whose structure does not match its family all produce an empty
//! [`TableRows`] plus a `warn` event. A handler that succeeds emits every one
//! of its tables, even those without rows.

mod account;
mod activity;
pub mod extract;
mod heart;
mod sleep;
mod vitals;

use crate::config::ClassifierConfig;
use crate::rows::{CandidateRow, TableRows};
use crate::schema::builtin::{ACTIVITY_SERIES, INTRADAY_SERIES};
use chrono::{NaiveDate, Utc};
use extract::ShapeError;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Per-call context handed to every handler
#[derive(Debug, Clone, Copy)]
pub struct ShapeContext<'a> {
    pub user_id: &'a str,
    pub reference_date: NaiveDate,
}

impl<'a> ShapeContext<'a> {
    pub fn new(user_id: &'a str, reference_date: NaiveDate) -> Self {
        ShapeContext {
            user_id,
            reference_date,
        }
    }

    /// Start a row with the identity columns. An unresolved date is left out
    /// so validation reports it.
    pub fn row(&self, date: Option<Value>) -> CandidateRow {
        let mut row = CandidateRow::new();
        row.insert("id".to_string(), Value::String(self.user_id.to_string()));
        if let Some(date) = date {
            row.insert("date".to_string(), date);
        }
        row
    }

    pub fn reference_date_value(&self) -> Value {
        Value::String(self.reference_date.format("%Y-%m-%d").to_string())
    }
}

type Handler = fn(&ShapeContext<'_>, &Value) -> Result<TableRows, ShapeError>;

/// Endpoint family recognised from a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    HeartRateZones,
    HeartRateIntraday,
    ActivityTimeSeries,
    DailyActivitySummary,
    ActivityIntraday,
    CaloriesIntraday,
    SkinTemperature,
    SpO2Summary,
    SpO2Intraday,
    Profile,
    Devices,
    Badges,
    Friends,
    WeightLogs,
    HrvSummary,
    HrvIntraday,
    BreathingRateIntraday,
    BreathingRateSummary,
    ActivityLogList,
    LifetimeStats,
    SleepLogRange,
    SleepLogByDate,
    SleepLogList,
    AzmTimeSeries,
    Vo2MaxSummary,
    AzmIntraday,
}

/// Substring rule over a lower-cased label
#[derive(Debug, Clone, Copy)]
pub struct LabelRule {
    /// Every one must occur
    pub all: &'static [&'static str],
    /// At least one must occur (ignored when empty)
    pub any: &'static [&'static str],
    /// None may occur
    pub none: &'static [&'static str],
}

impl LabelRule {
    const fn all(all: &'static [&'static str]) -> Self {
        LabelRule {
            all,
            any: &[],
            none: &[],
        }
    }

    const fn any(mut self, any: &'static [&'static str]) -> Self {
        self.any = any;
        self
    }

    const fn none(mut self, none: &'static [&'static str]) -> Self {
        self.none = none;
        self
    }

    pub fn matches(&self, label: &str) -> bool {
        self.all.iter().all(|s| label.contains(s))
            && (self.any.is_empty() || self.any.iter().any(|s| label.contains(s)))
            && !self.none.iter().any(|s| label.contains(s))
    }
}

/// Ordered dispatch table; first match wins.
pub const DISPATCH: &[(LabelRule, EndpointKind)] = &[
    (LabelRule::all(&["heart rate"]).none(&["intraday"]), EndpointKind::HeartRateZones),
    (LabelRule::all(&["heart rate", "intraday"]), EndpointKind::HeartRateIntraday),
    (LabelRule::all(&["activity time series", "no intraday"]), EndpointKind::ActivityTimeSeries),
    (LabelRule::all(&["daily activity summary"]), EndpointKind::DailyActivitySummary),
    (
        LabelRule::all(&["intraday"]).any(&["distance", "elevation", "floors", "steps"]),
        EndpointKind::ActivityIntraday,
    ),
    (LabelRule::all(&["calories", "intraday"]), EndpointKind::CaloriesIntraday),
    (LabelRule::all(&["temperature (skin)"]), EndpointKind::SkinTemperature),
    (LabelRule::all(&["spo2 summary"]), EndpointKind::SpO2Summary),
    (LabelRule::all(&["spo2 intraday"]), EndpointKind::SpO2Intraday),
    (LabelRule::all(&["profile"]), EndpointKind::Profile),
    (LabelRule::all(&["devices"]), EndpointKind::Devices),
    (LabelRule::all(&["badges"]), EndpointKind::Badges),
    (LabelRule::all(&["friends"]), EndpointKind::Friends),
    (LabelRule::all(&["weight"]), EndpointKind::WeightLogs),
    (LabelRule::all(&["hrv summary"]), EndpointKind::HrvSummary),
    (LabelRule::all(&["hrv intraday"]), EndpointKind::HrvIntraday),
    (LabelRule::all(&["breathing rate intraday"]), EndpointKind::BreathingRateIntraday),
    (LabelRule::all(&["breathing rate summary"]), EndpointKind::BreathingRateSummary),
    (LabelRule::all(&["activity log list"]), EndpointKind::ActivityLogList),
    (LabelRule::all(&["lifetime stats"]), EndpointKind::LifetimeStats),
    (LabelRule::all(&["sleep log by date range"]), EndpointKind::SleepLogRange),
    (LabelRule::all(&["sleep log by date"]), EndpointKind::SleepLogByDate),
    (LabelRule::all(&["sleep log list"]), EndpointKind::SleepLogList),
    (LabelRule::all(&["azm time series"]), EndpointKind::AzmTimeSeries),
    (LabelRule::all(&["vo2 max"]), EndpointKind::Vo2MaxSummary),
    (LabelRule::all(&["azm intraday"]), EndpointKind::AzmIntraday),
];

impl EndpointKind {
    pub const ALL: &'static [EndpointKind] = &[
        EndpointKind::HeartRateZones,
        EndpointKind::HeartRateIntraday,
        EndpointKind::ActivityTimeSeries,
        EndpointKind::DailyActivitySummary,
        EndpointKind::ActivityIntraday,
        EndpointKind::CaloriesIntraday,
        EndpointKind::SkinTemperature,
        EndpointKind::SpO2Summary,
        EndpointKind::SpO2Intraday,
        EndpointKind::Profile,
        EndpointKind::Devices,
        EndpointKind::Badges,
        EndpointKind::Friends,
        EndpointKind::WeightLogs,
        EndpointKind::HrvSummary,
        EndpointKind::HrvIntraday,
        EndpointKind::BreathingRateIntraday,
        EndpointKind::BreathingRateSummary,
        EndpointKind::ActivityLogList,
        EndpointKind::LifetimeStats,
        EndpointKind::SleepLogRange,
        EndpointKind::SleepLogByDate,
        EndpointKind::SleepLogList,
        EndpointKind::AzmTimeSeries,
        EndpointKind::Vo2MaxSummary,
        EndpointKind::AzmIntraday,
    ];

    /// Resolve a label through the dispatch table
    pub fn resolve(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        DISPATCH
            .iter()
            .find(|(rule, _)| rule.matches(&label))
            .map(|(_, kind)| *kind)
    }

    fn handler(self) -> Handler {
        match self {
            EndpointKind::HeartRateZones => heart::zones,
            EndpointKind::HeartRateIntraday => heart::intraday,
            EndpointKind::ActivityTimeSeries => activity::time_series,
            EndpointKind::DailyActivitySummary => activity::daily_summary,
            EndpointKind::ActivityIntraday => activity::intraday,
            EndpointKind::CaloriesIntraday => activity::calories_intraday,
            EndpointKind::SkinTemperature => vitals::skin_temperature,
            EndpointKind::SpO2Summary => vitals::spo2_summary,
            EndpointKind::SpO2Intraday => vitals::spo2_intraday,
            EndpointKind::Profile => account::profile,
            EndpointKind::Devices => account::devices,
            EndpointKind::Badges => account::badges,
            EndpointKind::Friends => account::friends,
            EndpointKind::WeightLogs => account::weight,
            EndpointKind::HrvSummary => vitals::hrv_summary,
            EndpointKind::HrvIntraday => vitals::hrv_intraday,
            EndpointKind::BreathingRateIntraday => vitals::breathing_rate,
            EndpointKind::BreathingRateSummary => vitals::breathing_rate_summary,
            EndpointKind::ActivityLogList => activity::log_list,
            EndpointKind::LifetimeStats => account::lifetime_stats,
            EndpointKind::SleepLogRange | EndpointKind::SleepLogByDate | EndpointKind::SleepLogList => {
                sleep::sleep_logs
            }
            EndpointKind::AzmTimeSeries => activity::azm_time_series,
            EndpointKind::Vo2MaxSummary => vitals::vo2_max,
            EndpointKind::AzmIntraday => activity::azm_intraday,
        }
    }

    /// Every table this kind can write to
    pub fn tables(self) -> Vec<&'static str> {
        match self {
            EndpointKind::HeartRateZones => vec!["heart_rate_zones"],
            EndpointKind::HeartRateIntraday => vec!["heart_rate"],
            EndpointKind::ActivityTimeSeries => ACTIVITY_SERIES.iter().map(|s| s.table).collect(),
            EndpointKind::DailyActivitySummary => {
                vec!["activity_logs", "activity_goals", "activity_summary"]
            }
            EndpointKind::ActivityIntraday => INTRADAY_SERIES.iter().map(|s| s.table).collect(),
            EndpointKind::CaloriesIntraday => vec!["intraday_calories"],
            EndpointKind::SkinTemperature => vec!["temp_skin"],
            EndpointKind::SpO2Summary => vec!["spo2"],
            EndpointKind::SpO2Intraday => vec!["spo2_intraday"],
            EndpointKind::Profile => vec!["profile"],
            EndpointKind::Devices => vec!["device"],
            EndpointKind::Badges => vec!["badges"],
            EndpointKind::Friends => vec!["social"],
            EndpointKind::WeightLogs => vec!["body_weight"],
            EndpointKind::HrvSummary => vec!["hrv_summary"],
            EndpointKind::HrvIntraday => vec!["hrv_intraday"],
            EndpointKind::BreathingRateIntraday => vec!["breathing_rate"],
            EndpointKind::BreathingRateSummary => vec!["breathing_rate_summary"],
            EndpointKind::ActivityLogList => vec!["activity_log_list"],
            EndpointKind::LifetimeStats => vec!["lifetime_stats"],
            EndpointKind::SleepLogRange | EndpointKind::SleepLogByDate | EndpointKind::SleepLogList => {
                vec!["sleep", "sleep_summary", "sleep_minutes"]
            }
            EndpointKind::AzmTimeSeries => vec!["azm_time_series"],
            EndpointKind::Vo2MaxSummary => vec!["vo2_max_summary"],
            EndpointKind::AzmIntraday => vec!["azm_intraday"],
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Label-driven payload normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    reference_date: NaiveDate,
}

impl Classifier {
    /// Classifier stamping snapshot endpoints with `reference_date`
    pub fn new(reference_date: NaiveDate) -> Self {
        Classifier { reference_date }
    }

    /// Classifier using the current UTC date
    pub fn today() -> Self {
        Classifier::new(Utc::now().date_naive())
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        config
            .reference_date
            .map_or_else(Classifier::today, Classifier::new)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Classify one payload. Never fails; see the module docs.
    pub fn classify(&self, label: &str, payload: &Value, user_id: &str) -> TableRows {
        if user_id.trim().is_empty() {
            warn!(label = %label, "classifier_missing_user");
            return TableRows::new();
        }

        let Some(kind) = EndpointKind::resolve(label) else {
            warn!(label = %label, "classifier_no_match");
            return TableRows::new();
        };

        let ctx = ShapeContext::new(user_id, self.reference_date);
        match (kind.handler())(&ctx, payload) {
            Ok(rows) => {
                debug!(
                    label = %label,
                    kind = %kind,
                    tables = rows.table_count(),
                    rows = rows.row_count(),
                    "payload_classified"
                );
                rows
            }
            Err(e) => {
                warn!(label = %label, kind = %kind, error = %e, "shape_extraction_failed");
                TableRows::new()
            }
        }
    }
}
