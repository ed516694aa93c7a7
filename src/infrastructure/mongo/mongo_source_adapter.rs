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

//! Infrastructure adapter for reading fruit names out of MongoDB.

use crate::config::SourceConfig;
use crate::domain::entities::Record;
use crate::domain::errors::{EtlError, Result};
use crate::ports::source_port::{SourcePort, SourceSession};
use log::{debug, info};
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::sync::{Client, Collection};
use std::time::Duration;

const NAME_FIELD: &str = "name";

/// Only the name is fetched; `_id` is explicitly excluded.
pub fn name_projection() -> Document {
    doc! { "_id": 0, "name": 1 }
}

/// Pulls the `name` out of a projected document.
///
/// A document without a string `name` is a read failure, not something to skip.
pub fn extract_name(document: &Document) -> Result<Record> {
    document
        .get_str(NAME_FIELD)
        .map(Record::new)
        .map_err(|e| EtlError::SourceReadError(format!("{} in document {}", e, document)))
}

/// Concrete implementation of `SourcePort` for MongoDB.
pub struct MongoSourceAdapter {
    config: SourceConfig,
    /// `None` keeps the driver default (30 seconds).
    server_selection_timeout: Option<Duration>,
}

impl MongoSourceAdapter {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            server_selection_timeout: None,
        }
    }

    #[cfg(test)]
    fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }

    fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: self.config.host.clone(),
            port: Some(self.config.port),
        }];
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        if let Some(timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
            options.connect_timeout = Some(timeout);
        }
        options
    }
}

impl SourcePort for MongoSourceAdapter {
    fn connect(&self) -> Result<Box<dyn SourceSession>> {
        let client = Client::with_options(self.client_options())
            .map_err(|e| EtlError::SourceConnectError(e.to_string()))?;

        // The driver connects lazily; ping so an unreachable server fails here.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| EtlError::SourceConnectError(e.to_string()))?;

        info!(
            "Connected to MongoDB at {}:{}",
            self.config.host, self.config.port
        );

        let collection = client
            .database(&self.config.database)
            .collection::<Document>(&self.config.collection);

        Ok(Box::new(MongoSession {
            client: Some(client),
            collection,
            label: format!("{}.{}", self.config.database, self.config.collection),
        }))
    }
}

struct MongoSession {
    /// Taken on drop so the client can be shut down explicitly.
    client: Option<Client>,
    collection: Collection<Document>,
    label: String,
}

impl SourceSession for MongoSession {
    fn fetch_names(&mut self) -> Result<Vec<Record>> {
        debug!("Querying {} with projection {}", self.label, name_projection());
        let cursor = self
            .collection
            .find(doc! {})
            .projection(name_projection())
            .run()
            .map_err(|e| EtlError::SourceReadError(e.to_string()))?;

        let mut names = Vec::new();
        for document in cursor {
            let document = document.map_err(|e| EtlError::SourceReadError(e.to_string()))?;
            names.push(extract_name(&document)?);
        }
        Ok(names)
    }
}

impl MongoSession {
    fn drop_client(&mut self) {
        if let Some(client) = self.client.take() {
            debug!("Closing MongoDB connection for {}", self.label);
            client.shutdown().run();
        }
    }
}

impl Drop for MongoSession {
    fn drop(&mut self) {
        self.drop_client();
    }
}
