//! # Configuration
//!
//! An invocation is configured by an optional "event" document. Every
//! connection parameter is resolved once, in this order:
//!
//! 1. the value carried by the event,
//! 2. the upper-cased environment variable (`MONGO_HOST`, `PG_PASSWORD`, ...),
//! 3. the built-in default.
//!
//! The resolved [`EtlConfig`] is immutable for the rest of the invocation.

use crate::domain::errors::{EtlError, Result};
use clap::Parser;
use log::warn;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;

pub const DEFAULT_MONGO_HOST: &str = "localhost";
pub const DEFAULT_MONGO_PORT: u16 = 27017;
pub const DEFAULT_MONGO_DB: &str = "fruitDB";
pub const DEFAULT_MONGO_COLLECTION: &str = "fruits";
pub const DEFAULT_PG_HOST: &str = "localhost";
pub const DEFAULT_PG_PORT: u16 = 5432;
pub const DEFAULT_PG_DB: &str = "fruitdb";
pub const DEFAULT_PG_USER: &str = "postgres";
pub const DEFAULT_PG_PASSWORD: &str = "password";

/// A scalar event value. Events are hand-written, so `27017`, `"27017"` and
/// `true` are all accepted and read back as text where text is expected.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn to_port(&self) -> Option<u16> {
        match self {
            ParamValue::Integer(n) => u16::try_from(*n).ok(),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) | ParamValue::Float(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// The triggering event. Every field is optional; unknown fields are ignored.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct InvocationEvent {
    pub mongo_host: Option<ParamValue>,
    pub mongo_port: Option<ParamValue>,
    pub mongo_db: Option<ParamValue>,
    pub mongo_collection: Option<ParamValue>,
    pub pg_host: Option<ParamValue>,
    pub pg_port: Option<ParamValue>,
    pub pg_db: Option<ParamValue>,
    pub pg_user: Option<ParamValue>,
    pub pg_password: Option<ParamValue>,
}

impl InvocationEvent {
    /// Loads an event from a JSON or YAML file (chosen by extension).
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            serde_yaml::from_str(&contents)
                .map_err(|e| EtlError::ConfigError(format!("{}: {}", path, e)))
        } else {
            Self::from_json(&contents)
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(contents).map_err(|e| EtlError::ConfigError(e.to_string()))
    }
}

/// Where the names are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
}

/// Where the names are written to.
#[derive(Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved connection parameters for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub source: SourceConfig,
    pub sink: SinkConfig,
}

impl EtlConfig {
    /// Resolves against the process environment.
    pub fn resolve(event: &InvocationEvent) -> Self {
        Self::resolve_with(event, |key| std::env::var(key).ok())
    }

    /// Resolves using `env` as the environment lookup.
    pub fn resolve_with<F>(event: &InvocationEvent, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |explicit: &Option<ParamValue>, key: &str, default: &str| -> String {
            explicit
                .as_ref()
                .map(ParamValue::to_text)
                .or_else(|| env(key))
                .unwrap_or_else(|| default.to_string())
        };

        let port = |explicit: &Option<ParamValue>, key: &str, default: u16| -> u16 {
            if let Some(value) = explicit {
                match value.to_port() {
                    Some(p) => return p,
                    None => warn!("Ignoring invalid port {} from event for {}", value, key),
                }
            }
            if let Some(raw) = env(key) {
                match raw.trim().parse::<u16>() {
                    Ok(p) => return p,
                    Err(_) => warn!("Ignoring invalid port {:?} from environment {}", raw, key),
                }
            }
            default
        };

        Self {
            source: SourceConfig {
                host: text(&event.mongo_host, "MONGO_HOST", DEFAULT_MONGO_HOST),
                port: port(&event.mongo_port, "MONGO_PORT", DEFAULT_MONGO_PORT),
                database: text(&event.mongo_db, "MONGO_DB", DEFAULT_MONGO_DB),
                collection: text(
                    &event.mongo_collection,
                    "MONGO_COLLECTION",
                    DEFAULT_MONGO_COLLECTION,
                ),
            },
            sink: SinkConfig {
                host: text(&event.pg_host, "PG_HOST", DEFAULT_PG_HOST),
                port: port(&event.pg_port, "PG_PORT", DEFAULT_PG_PORT),
                database: text(&event.pg_db, "PG_DB", DEFAULT_PG_DB),
                user: text(&event.pg_user, "PG_USER", DEFAULT_PG_USER),
                password: text(&event.pg_password, "PG_PASSWORD", DEFAULT_PG_PASSWORD),
            },
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the invocation event (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long)]
    pub event: Option<String>,

    /// Inline invocation event as a JSON object
    #[arg(long, conflicts_with = "event")]
    pub event_json: Option<String>,

    /// Pretty-print the outcome
    #[arg(long)]
    pub pretty: bool,
}

impl CliArgs {
    /// Reads the event named on the command line, or an empty one.
    pub fn load_event(&self) -> Result<InvocationEvent> {
        if let Some(path) = &self.event {
            InvocationEvent::from_file(path)
        } else if let Some(json) = &self.event_json {
            InvocationEvent::from_json(json)
        } else {
            Ok(InvocationEvent::default())
        }
    }
}
