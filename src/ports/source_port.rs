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

//! # Source Port
//!
//! The contract for the store we extract names from. The runner does not care
//! whether it talks to MongoDB or to an in-memory fake; anything implementing
//! `SourcePort` can be plugged in.

use crate::domain::entities::Record;
use crate::domain::errors::Result;

/// Opens sessions against a document store.
pub trait SourcePort: Send + Sync {
    /// Opens a session. Failures must be reported as `EtlError::SourceConnectError`.
    fn connect(&self) -> Result<Box<dyn SourceSession>>;
}

/// An open source connection, released when dropped.
pub trait SourceSession {
    /// Reads the `name` of every document in the configured collection, in
    /// store order. Failures must be reported as `EtlError::SourceReadError`.
    fn fetch_names(&mut self) -> Result<Vec<Record>>;
}
