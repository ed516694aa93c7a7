// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core error definitions for the fruit loader.
//!
//! Each pipeline step owns exactly one variant, so a failure can always be
//! traced back to the step that produced it. `ConfigError` is only raised by
//! the CLI while reading the invocation event, never by the runner itself.

use thiserror::Error;

/// Error types encountered during an ETL invocation.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Error connecting to MongoDB: {0}")]
    SourceConnectError(String),

    #[error("Error reading data from MongoDB: {0}")]
    SourceReadError(String),

    #[error("Error connecting to PostgreSQL: {0}")]
    SinkConnectError(String),

    #[error("Error inserting data into PostgreSQL: {0}")]
    SinkWriteError(String),
}

impl EtlError {
    /// The pipeline step this error belongs to, used as a log tag.
    pub fn step(&self) -> &'static str {
        match self {
            EtlError::ConfigError(_) => "config",
            EtlError::SourceConnectError(_) => "source-connect",
            EtlError::SourceReadError(_) => "extract",
            EtlError::SinkConnectError(_) => "sink-connect",
            EtlError::SinkWriteError(_) => "load",
        }
    }
}

impl From<std::io::Error> for EtlError {
    fn from(e: std::io::Error) -> Self {
        EtlError::ConfigError(e.to_string())
    }
}

/// A specialized Result type for the fruit loader.
pub type Result<T> = std::result::Result<T, EtlError>;
