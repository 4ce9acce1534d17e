// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the daily currency load.

use std::path::PathBuf;
use thiserror::Error;

/// Any failure that ends a run. Every variant is fatal.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("connection error: {0}")]
    Connection(#[source] DbError),

    #[error("execution error: {0}")]
    Execution(#[source] DbError),
}

impl EtlError {
    /// Short label of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            EtlError::Config(_) => "config",
            EtlError::Fetch(_) => "fetch",
            EtlError::Parse(_) => "parse",
            EtlError::Connection(_) => "connect",
            EtlError::Execution(_) => "execute",
        }
    }
}

impl From<DbError> for EtlError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connect { .. } | DbError::InvalidSettings(_) => EtlError::Connection(err),
            _ => EtlError::Execution(err),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read settings file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file '{}' is not valid TOML: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("section '{section}' not found in the file '{}'", .path.display())]
    MissingSection { path: PathBuf, section: String },

    #[error("'{0}' is not a valid table name")]
    InvalidTable(String),

    #[error("section '{section}' must be a table, found {found}")]
    NotATable { section: String, found: &'static str },

    #[error("section '{section}' is invalid: {source}")]
    InvalidSection {
        section: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("feed is not a valid currency document: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// One `Valute` entry broke the feed contract. All of its problems are
    /// listed, not only the first.
    #[error("record #{index} (ID {}): {}", .id.as_deref().unwrap_or("<missing>"), .problems.join("; "))]
    InvalidRecord {
        index: usize,
        id: Option<String>,
        problems: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid connection settings: {0}")]
    InvalidSettings(String),

    #[error("couldn't establish connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("couldn't execute query '{query}': {source}")]
    Execution {
        query: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("couldn't execute bulk insert '{query}' at row {row}: {source}")]
    Batch {
        query: String,
        row: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("connection to {0} is already closed")]
    Closed(String),
}
