//! # Domain Entities
//!
//! The "Nouns" of the loader: the records we move, the stages an invocation
//! walks through, and the outcome reported back to whoever triggered it.
//!
//! We use the `serde` crate so the outcome can be printed as JSON.

use serde::Serialize;
use std::fmt;

/// Message reported on every successful invocation.
pub const SUCCESS_MESSAGE: &str = "ETL process completed successfully";

/// `Record` is a single named entity extracted from the source.
///
/// It has no identity beyond its name. Uniqueness is enforced by the sink,
/// never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record(String);

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The position of an invocation in its linear pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    SourceConnected,
    Extracted,
    SinkConnected,
    Loaded,
    CleanedUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "START",
            Stage::SourceConnected => "SOURCE_CONNECTED",
            Stage::Extracted => "EXTRACTED",
            Stage::SinkConnected => "SINK_CONNECTED",
            Stage::Loaded => "LOADED",
            Stage::CleanedUp => "CLEANED_UP",
        };
        f.write_str(s)
    }
}

/// Counts gathered while loading one extracted set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of insert statements executed.
    pub attempted: usize,
    /// Rows actually written; the rest were skipped by the conflict clause.
    pub inserted: u64,
}

impl LoadReport {
    pub fn skipped(&self) -> u64 {
        (self.attempted as u64).saturating_sub(self.inserted)
    }
}

/// `EtlOutcome` is the "Report Card" handed back to the invoker.
///
/// Serializes as `{"status": "success", "message": ...}` or
/// `{"status": "failed", "error": ...}`. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EtlOutcome {
    Success {
        message: String,
        /// How many names were extracted from the source.
        #[serde(skip)]
        extracted: usize,
    },
    Failed {
        error: String,
    },
}

impl EtlOutcome {
    /// Helper to create a successful outcome.
    pub fn success(extracted: usize) -> Self {
        EtlOutcome::Success {
            message: SUCCESS_MESSAGE.to_string(),
            extracted,
        }
    }

    /// Helper to create a failed outcome.
    pub fn failure(error: impl fmt::Display) -> Self {
        EtlOutcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EtlOutcome::Success { .. })
    }

    /// Extracted count for a success, `None` for a failure.
    pub fn extracted(&self) -> Option<usize> {
        match self {
            EtlOutcome::Success { extracted, .. } => Some(*extracted),
            EtlOutcome::Failed { .. } => None,
        }
    }
}
