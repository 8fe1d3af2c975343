//! Usage aggregation for the analytics charts.
//!
//! The analytics source (external to this crate) exports chat usage as
//! JSON; this module parses it into validated records and folds them
//! into the chart-ready aggregates: chronological daily buckets and
//! per-model totals. Parsing a document either succeeds or fails as a
//! whole; individual records with unparseable timestamps are skipped
//! and counted, never fatal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Model label used when a record carries none.
pub const UNKNOWN_MODEL: &str = "unknown";

// ===== TokenCounts =====

/// Token counters for one record or one aggregate bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    /// Prompt-side tokens.
    pub input_tokens: u64,
    /// Completion-side tokens.
    pub output_tokens: u64,
}

impl TokenCounts {
    /// Sum of both directions.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    fn accumulate(&mut self, other: TokenCounts) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

// ===== UsageRecord =====

/// One chat turn in the usage export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    timestamp: DateTime<Utc>,
    model: String,
    counts: TokenCounts,
}

impl UsageRecord {
    /// Create a record (parsing and tests).
    pub fn new(timestamp: DateTime<Utc>, model: impl Into<String>, counts: TokenCounts) -> Self {
        Self {
            timestamp,
            model: model.into(),
            counts,
        }
    }

    /// When the turn happened.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Model identifier for the turn.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Token counters for the turn.
    pub fn counts(&self) -> TokenCounts {
        self.counts
    }
}

// ===== Parsing =====

/// Raw JSON structure of one exported record.
#[derive(Debug, Deserialize)]
struct RawUsageRecord {
    timestamp: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Error for an unparseable usage export document.
#[derive(Debug, Error)]
pub enum UsageParseError {
    /// The document is not a JSON array of records.
    #[error("invalid usage export: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed usage export: validated records plus the skipped count.
#[derive(Debug, Clone, Default)]
pub struct UsageLog {
    records: Vec<UsageRecord>,
    skipped: usize,
}

impl UsageLog {
    /// Records that validated.
    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    /// Records dropped for an unparseable timestamp.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Parse a usage export document.
///
/// The document must be a JSON array; records inside it that fail
/// timestamp validation are skipped and counted.
pub fn parse_usage_log(json: &str) -> Result<UsageLog, UsageParseError> {
    let raw: Vec<RawUsageRecord> = serde_json::from_str(json)?;
    let mut log = UsageLog::default();

    for record in raw {
        match DateTime::parse_from_rfc3339(&record.timestamp) {
            Ok(timestamp) => log.records.push(UsageRecord::new(
                timestamp.with_timezone(&Utc),
                record.model.unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
                TokenCounts {
                    input_tokens: record.input_tokens,
                    output_tokens: record.output_tokens,
                },
            )),
            Err(error) => {
                warn!(timestamp = %record.timestamp, %error, "skipping usage record");
                log.skipped += 1;
            }
        }
    }

    Ok(log)
}

// ===== Aggregation =====

/// One day's usage, for the daily bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyUsage {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Tokens accumulated over the day.
    pub counts: TokenCounts,
    /// Number of chat turns that day.
    pub messages: u32,
}

/// Fold records into chronologically ordered daily buckets.
pub fn aggregate_daily(records: &[UsageRecord]) -> Vec<DailyUsage> {
    let mut days: BTreeMap<NaiveDate, (TokenCounts, u32)> = BTreeMap::new();
    for record in records {
        let bucket = days.entry(record.timestamp().date_naive()).or_default();
        bucket.0.accumulate(record.counts());
        bucket.1 += 1;
    }
    days.into_iter()
        .map(|(date, (counts, messages))| DailyUsage {
            date,
            counts,
            messages,
        })
        .collect()
}

/// One model's totals, for the breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUsage {
    /// Model identifier.
    pub model: String,
    /// Tokens accumulated for the model.
    pub counts: TokenCounts,
    /// Number of chat turns for the model.
    pub messages: u32,
}

/// Fold records into per-model totals, largest first.
///
/// Ties break on the model name so output order is deterministic.
pub fn totals_by_model(records: &[UsageRecord]) -> Vec<ModelUsage> {
    let mut models: BTreeMap<&str, (TokenCounts, u32)> = BTreeMap::new();
    for record in records {
        let bucket = models.entry(record.model()).or_default();
        bucket.0.accumulate(record.counts());
        bucket.1 += 1;
    }
    let mut totals: Vec<ModelUsage> = models
        .into_iter()
        .map(|(model, (counts, messages))| ModelUsage {
            model: model.to_string(),
            counts,
            messages,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.counts
            .total()
            .cmp(&a.counts.total())
            .then_with(|| a.model.cmp(&b.model))
    });
    totals
}

/// Human-readable short name for a model identifier.
///
/// Recognizes the model families the client ships with; anything else
/// is shown as-is.
pub fn model_display_name(id: &str) -> &str {
    if id.contains("opus") {
        "Opus"
    } else if id.contains("sonnet") {
        "Sonnet"
    } else if id.contains("haiku") {
        "Haiku"
    } else {
        id
    }
}

// ===== Tests =====
