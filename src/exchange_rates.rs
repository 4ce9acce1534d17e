// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use crate::api::FeedSource;
use crate::config::{check_table_name, load_connection_settings};
use crate::currencies::parse_currency_feed;
use crate::db::{insert_statement, SqlClient};
use crate::error::{DbError, EtlError};
use crate::models::CurrencyRecord;
use crate::utils::request_url;
use anyhow::{Context, Result};
use sqlx::FromRow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CBR_DAILY_URL: &str = "http://www.cbr.ru/scripts/XML_daily.asp?date_req=";
pub const DEFAULT_TABLE: &str = "cbrf.currency";

/// Everything one daily load needs besides the feed client and the date.
#[derive(Debug, Clone)]
pub struct DailyJob {
    pub base_url: String,
    pub config_path: PathBuf,
    pub section: String,
    pub table: String,
}

/// Fetch the feed for `request_date`, parse it and append every record to
/// the destination table. Returns the number of inserted rows.
///
/// Nothing is written unless the whole feed parses.
pub async fn load_daily_rates(
    feed: &impl FeedSource,
    job: &DailyJob,
    request_date: &str,
) -> Result<u64, EtlError> {
    check_table_name(&job.table)?;

    let url = request_url(&job.base_url, request_date);
    let xml = feed.fetch(&url).await?;
    let records = parse_currency_feed(&xml)?;

    let settings = load_connection_settings(&job.config_path, &job.section)?;
    let mut client = SqlClient::connect(&settings)
        .await
        .map_err(EtlError::Connection)?;

    let inserted = store_rates(&mut client, &job.table, &records).await?;
    info!("✅ Loaded {} rates for {} into {}", inserted, request_date, job.table);
    Ok(inserted)
}

/// Batch-insert `records` into `table`, then close `client` whatever the
/// outcome.
pub async fn store_rates(
    client: &mut SqlClient,
    table: &str,
    records: &[CurrencyRecord],
) -> Result<u64, EtlError> {
    let inserted = client
        .insert_batch(&insert_statement(table), records)
        .await;
    client.close().await;
    Ok(inserted?)
}

/// Write the first `limit` rows of the destination table to `out` as CSV.
pub async fn peek_rates(
    config_path: &Path,
    section: &str,
    table: &str,
    limit: u32,
    out: impl Write,
) -> Result<usize> {
    check_table_name(table).map_err(EtlError::from)?;
    let settings = load_connection_settings(config_path, section).map_err(EtlError::from)?;
    let mut client = SqlClient::connect(&settings)
        .await
        .map_err(EtlError::Connection)?;

    let query = format!("SELECT * FROM {} LIMIT {}", table, limit);
    let rows = client.execute(&query, true).await;
    client.close().await;
    let rows = rows.map_err(EtlError::from)?.unwrap_or_default();

    let records = rows
        .iter()
        .map(CurrencyRecord::from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| EtlError::Execution(DbError::Execution { query, source }))?;

    let mut writer = csv::Writer::from_writer(out);
    for record in &records {
        writer.serialize(record).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(records.len())
}
