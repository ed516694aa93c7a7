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

//! Infrastructure adapter for upserting fruit names into PostgreSQL.
//!
//! The target table must already exist:
//!
//! ```sql
//! CREATE TABLE fruit_table (name TEXT UNIQUE);
//! ```

use crate::config::SinkConfig;
use crate::domain::errors::{EtlError, Result};
use crate::ports::sink_port::{SinkPort, SinkSession, SinkTransaction};
use log::{debug, info};
use postgres::{Client, Config, NoTls, Transaction};

/// One row per statement; the unique constraint on `name` absorbs duplicates.
pub const SQL_UPSERT_NAME: &str =
    "INSERT INTO fruit_table (name) VALUES ($1) ON CONFLICT (name) DO NOTHING";

fn write_err(e: postgres::Error) -> EtlError {
    EtlError::SinkWriteError(e.to_string())
}

/// Concrete implementation of `SinkPort` for PostgreSQL.
pub struct PostgresSinkAdapter {
    config: SinkConfig,
}

impl PostgresSinkAdapter {
    pub fn new(config: SinkConfig) -> Self {
        Self { config }
    }

    fn pg_config(&self) -> Config {
        let mut pg = Config::new();
        pg.host(&self.config.host)
            .port(self.config.port)
            .dbname(&self.config.database)
            .user(&self.config.user)
            .password(&self.config.password)
            .application_name(env!("CARGO_PKG_NAME"));
        pg
    }
}

impl SinkPort for PostgresSinkAdapter {
    fn connect(&self) -> Result<Box<dyn SinkSession>> {
        let client = self
            .pg_config()
            .connect(NoTls)
            .map_err(|e| EtlError::SinkConnectError(e.to_string()))?;

        info!(
            "Connected to PostgreSQL at {}:{}",
            self.config.host, self.config.port
        );

        Ok(Box::new(PostgresSession {
            client,
            label: format!("{}:{}/{}", self.config.host, self.config.port, self.config.database),
        }))
    }
}

struct PostgresSession {
    client: Client,
    label: String,
}

impl SinkSession for PostgresSession {
    fn begin(&mut self) -> Result<Box<dyn SinkTransaction + '_>> {
        let txn = self.client.transaction().map_err(write_err)?;
        Ok(Box::new(PostgresTransaction { txn }))
    }
}

impl Drop for PostgresSession {
    fn drop(&mut self) {
        debug!("Closing PostgreSQL connection to {}", self.label);
    }
}

struct PostgresTransaction<'a> {
    txn: Transaction<'a>,
}

impl SinkTransaction for PostgresTransaction<'_> {
    fn insert_name(&mut self, name: &str) -> Result<u64> {
        self.txn.execute(SQL_UPSERT_NAME, &[&name]).map_err(write_err)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.txn.commit().map_err(write_err)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.txn.rollback().map_err(write_err)
    }
}
