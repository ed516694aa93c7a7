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

//! # Sink Port
//!
//! The contract for the relational store names are loaded into.
//!
//! A session hands out one transaction at a time. The transaction borrows the
//! session, so it is always released before the connection that owns it.

use crate::domain::errors::Result;

/// Opens sessions against a relational store.
pub trait SinkPort: Send + Sync {
    /// Opens a session. Failures must be reported as `EtlError::SinkConnectError`.
    fn connect(&self) -> Result<Box<dyn SinkSession>>;
}

/// An open sink connection, released when dropped.
pub trait SinkSession {
    /// Starts the transaction that covers the whole load.
    fn begin(&mut self) -> Result<Box<dyn SinkTransaction + '_>>;
}

/// A unit of work on the sink. Dropping it without `commit` discards it.
pub trait SinkTransaction {
    /// Upserts one name, skipping it if the name already exists.
    ///
    /// Returns the number of rows written (0 when skipped).
    fn insert_name(&mut self, name: &str) -> Result<u64>;

    fn commit(self: Box<Self>) -> Result<()>;

    fn rollback(self: Box<Self>) -> Result<()>;
}
