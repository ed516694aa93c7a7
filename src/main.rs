//! # Fruit ETL
//!
//! A one-shot loader that reads fruit names from a MongoDB collection and
//! upserts them into the PostgreSQL table `fruit_table`, skipping names that
//! are already present.
//!
//! This application follows the **Hexagonal Architecture** (Ports and Adapters)
//! to keep the pipeline logic independent of the two database drivers.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

use crate::application::etl_runner::EtlRunner;
use crate::config::{CliArgs, EtlConfig};
use crate::domain::entities::EtlOutcome;
use crate::infrastructure::mongo::mongo_source_adapter::MongoSourceAdapter;
use crate::infrastructure::postgres::postgres_sink_adapter::PostgresSinkAdapter;
use clap::Parser;
use log::{debug, error, info};
use std::process;
use std::sync::Arc;

fn main() {
    // 1. Initialize Logging
    env_logger::init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load the invocation event
    let event = match args.load_event() {
        Ok(e) => e,
        Err(e) => {
            error!("Failed to load event: {}", e);
            print_outcome(&EtlOutcome::failure(e), args.pretty);
            process::exit(1);
        }
    };

    // 4. Resolve configuration (event > environment > defaults)
    let config = EtlConfig::resolve(&event);
    debug!("Resolved configuration: {:?}", config);

    // 5. Initialize Hexagonal Components
    let source = Arc::new(MongoSourceAdapter::new(config.source));
    let sink = Arc::new(PostgresSinkAdapter::new(config.sink));

    // 6. Run
    info!("Starting ETL process...");
    let outcome = EtlRunner::new(source, sink).run();
    print_outcome(&outcome, args.pretty);

    if !outcome.is_success() {
        process::exit(1);
    }
}

fn print_outcome(outcome: &EtlOutcome, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize outcome: {}", e),
    }
}
