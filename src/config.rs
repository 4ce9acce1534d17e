use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_SECTION: &str = "postgres";

/// Where the records go. Read from one named section of the settings file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionSettings {
    Postgres(PostgresSettings),
    Sqlite(SqliteSettings),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostgresSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Extra libpq parameters (`sslmode`, `application_name`, ...), passed on untouched.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteSettings {
    pub path: PathBuf,
}

fn default_port() -> u16 {
    5432
}

impl ConnectionSettings {
    fn from_section(section: &str, table: toml::Table) -> Result<Self, ConfigError> {
        let invalid = |source: toml::de::Error| ConfigError::InvalidSection {
            section: section.to_string(),
            source,
        };
        if table.contains_key("path") {
            toml::Value::Table(table)
                .try_into()
                .map(ConnectionSettings::Sqlite)
                .map_err(invalid)
        } else {
            toml::Value::Table(table)
                .try_into()
                .map(ConnectionSettings::Postgres)
                .map_err(invalid)
        }
    }

    /// Human-readable target for log lines. Never includes credentials.
    pub fn describe(&self) -> String {
        match self {
            ConnectionSettings::Postgres(pg) => {
                format!("database '{}' on host '{}'", pg.database, pg.host)
            }
            ConnectionSettings::Sqlite(lite) => {
                format!("sqlite database '{}'", lite.path.display())
            }
        }
    }
}

/// Table names are spliced into SQL text, so only plain identifiers with an
/// optional schema prefix (`cbrf.currency`) are accepted.
pub fn check_table_name(table: &str) -> Result<(), ConfigError> {
    let is_identifier = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = table.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|part| is_identifier(part)) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTable(table.to_string()))
    }
}

/// Read `section` from the TOML settings file at `path`.
pub fn load_connection_settings(
    path: impl AsRef<Path>,
    section: &str,
) -> Result<ConnectionSettings, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_connection_settings(path, &config_str, section)
}

fn parse_connection_settings(
    path: &Path,
    config_str: &str,
    section: &str,
) -> Result<ConnectionSettings, ConfigError> {
    let mut document: toml::Table =
        toml::from_str(config_str).map_err(|source| ConfigError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;

    match document.remove(section) {
        Some(toml::Value::Table(table)) => ConnectionSettings::from_section(section, table),
        Some(other) => Err(ConfigError::NotATable {
            section: section.to_string(),
            found: other.type_str(),
        }),
        None => Err(ConfigError::MissingSection {
            path: path.to_path_buf(),
            section: section.to_string(),
        }),
    }
}
