use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{FromRow, Row};

/// One decoded currency-rate entry of the daily feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRecord {
    pub id: String,
    pub num_code: String,
    pub char_code: String,
    pub nominal: i32,
    pub name: String,
    pub value: f64,
}

// Positional, in destination column order.
impl<'r> FromRow<'r, AnyRow> for CurrencyRecord {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let nominal: i64 = row.try_get(3)?;
        Ok(Self {
            id: row.try_get(0)?,
            num_code: row.try_get(1)?,
            char_code: row.try_get(2)?,
            nominal: i32::try_from(nominal).map_err(|e| sqlx::Error::ColumnDecode {
                index: "3".to_string(),
                source: Box::new(e),
            })?,
            name: row.try_get(4)?,
            value: row.try_get(5)?,
        })
    }
}

/// Root `ValCurs` element of the feed, decoded as-is.
#[derive(Debug, Deserialize)]
pub struct RawFeed {
    #[serde(rename = "@Date")]
    pub date: Option<String>,
    #[serde(rename = "Valute", default)]
    pub valutes: Vec<RawValute>,
}

/// A `Valute` element before validation. Every field is optional here so
/// that all contract violations of one entry can be reported together.
#[derive(Debug, Deserialize)]
pub struct RawValute {
    #[serde(rename = "@ID")]
    pub id: Option<String>,
    #[serde(rename = "NumCode")]
    pub num_code: Option<String>,
    #[serde(rename = "CharCode")]
    pub char_code: Option<String>,
    #[serde(rename = "Nominal")]
    pub nominal: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
}
