//! The core application logic that runs one extract-and-load invocation.
//!
//! The runner walks a strictly linear pipeline:
//! `START -> SOURCE_CONNECTED -> EXTRACTED -> SINK_CONNECTED -> LOADED -> CLEANED_UP`.
//! Any step may fail, which ends the invocation with a failed `EtlOutcome`.
//! Sessions are owned by the stack frame that opened them, so every session
//! that was acquired is also released, whichever step fails.

use crate::domain::entities::{EtlOutcome, LoadReport, Record, Stage};
use crate::domain::errors::Result;
use crate::ports::sink_port::{SinkPort, SinkSession};
use crate::ports::source_port::SourcePort;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Moves names from a source store into a sink store.
pub struct EtlRunner {
    source: Arc<dyn SourcePort>,
    sink: Arc<dyn SinkPort>,
}

impl EtlRunner {
    pub fn new(source: Arc<dyn SourcePort>, sink: Arc<dyn SinkPort>) -> Self {
        Self { source, sink }
    }

    /// Runs the invocation. Errors never escape; they become a failed outcome.
    pub fn run(&self) -> EtlOutcome {
        match self.execute() {
            Ok(extracted) => {
                info!("ETL finished: {} names extracted", extracted);
                EtlOutcome::success(extracted)
            }
            Err(e) => {
                error!("[{}] {}", e.step(), e);
                EtlOutcome::failure(e)
            }
        }
    }

    fn execute(&self) -> Result<usize> {
        let mut stage = Stage::Start;

        let mut source = self.source.connect()?;
        advance(&mut stage, Stage::SourceConnected);

        let names = source.fetch_names()?;
        info!("Extracted {} fruit types from MongoDB", names.len());
        advance(&mut stage, Stage::Extracted);

        // On failure `source` is dropped here, closing the MongoDB connection.
        let mut sink = self.sink.connect()?;
        advance(&mut stage, Stage::SinkConnected);

        let loaded = load(sink.as_mut(), &names);
        if let Ok(report) = &loaded {
            info!(
                "Inserted {} fruit types into PostgreSQL ({} new, {} already present)",
                report.attempted,
                report.inserted,
                report.skipped()
            );
            advance(&mut stage, Stage::Loaded);
        }

        drop(sink);
        drop(source);
        advance(&mut stage, Stage::CleanedUp);

        loaded.map(|_| names.len())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("{} -> {}", stage, next);
    *stage = next;
}

/// Upserts every name inside one transaction.
///
/// The first failing insert stops the loop and rolls the transaction back;
/// names after it are never sent.
fn load(sink: &mut dyn SinkSession, names: &[Record]) -> Result<LoadReport> {
    let mut txn = sink.begin()?;
    let mut report = LoadReport::default();

    for record in names {
        match txn.insert_name(record.name()) {
            Ok(rows) => {
                report.attempted += 1;
                report.inserted += rows;
            }
            Err(e) => {
                warn!(
                    "Insert of '{}' failed after {} successful inserts, rolling back",
                    record,
                    report.attempted
                );
                if let Err(rollback_err) = txn.rollback() {
                    warn!("Rollback failed: {}", rollback_err);
                }
                return Err(e);
            }
        }
    }

    txn.commit()?;
    Ok(report)
}
