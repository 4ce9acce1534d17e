// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::ParseError;
use crate::models::{CurrencyRecord, RawFeed, RawValute};
use tracing::info;

/// Parse the daily rate feed into records, in document order.
///
/// Fails on the first malformed entry; nothing is returned for a partially
/// valid document.
pub fn parse_currency_feed(xml: &str) -> Result<Vec<CurrencyRecord>, ParseError> {
    let feed: RawFeed = quick_xml::de::from_str(xml)?;

    let records = feed
        .valutes
        .into_iter()
        .enumerate()
        .map(|(index, raw)| validate_record(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Parsed {} records from feed dated {}",
        records.len(),
        feed.date.as_deref().unwrap_or("<undated>")
    );
    Ok(records)
}

fn validate_record(index: usize, raw: RawValute) -> Result<CurrencyRecord, ParseError> {
    let mut problems = Vec::new();

    let id = required(raw.id, "ID attribute", &mut problems);
    let num_code = required(raw.num_code, "NumCode", &mut problems);
    let char_code = required(raw.char_code, "CharCode", &mut problems);
    let name = required(raw.name, "Name", &mut problems);

    let nominal = required(raw.nominal, "Nominal", &mut problems).and_then(|text| {
        match parse_nominal(&text) {
            Ok(n) => Some(n),
            Err(problem) => {
                problems.push(problem);
                None
            }
        }
    });
    let value = required(raw.value, "Value", &mut problems).and_then(|text| {
        match parse_value(&text) {
            Ok(v) => Some(v),
            Err(problem) => {
                problems.push(problem);
                None
            }
        }
    });

    match (id, num_code, char_code, nominal, name, value) {
        (Some(id), Some(num_code), Some(char_code), Some(nominal), Some(name), Some(value)) => {
            Ok(CurrencyRecord {
                id,
                num_code,
                char_code,
                nominal,
                name,
                value,
            })
        }
        (id, ..) => Err(ParseError::InvalidRecord {
            index,
            id,
            problems,
        }),
    }
}

/// An empty element counts as missing.
fn required(field: Option<String>, label: &str, problems: &mut Vec<String>) -> Option<String> {
    let field = field.filter(|text| !text.is_empty());
    if field.is_none() {
        problems.push(format!("missing {}", label));
    }
    field
}

fn parse_nominal(text: &str) -> Result<i32, String> {
    let nominal: i32 = text
        .trim()
        .parse()
        .map_err(|_| format!("Nominal '{}' is not an integer", text))?;
    if nominal < 1 {
        return Err(format!("Nominal {} is not positive", nominal));
    }
    Ok(nominal)
}

/// The feed writes decimals with a comma.
fn parse_value(text: &str) -> Result<f64, String> {
    let normalized = text.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| format!("Value '{}' is not a number", text))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Value '{}' is not a non-negative real number", text));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="05.03.2024" name="Foreign Currency Market">
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>US Dollar</Name>
        <Value>92,5000</Value>
        <VunitRate>92,5</VunitRate>
    </Valute>
    <Valute ID="R01239">
        <NumCode>978</NumCode>
        <CharCode>EUR</CharCode>
        <Nominal>1</Nominal>
        <Name>Euro</Name>
        <Value>100,1000</Value>
        <VunitRate>100,1</VunitRate>
    </Valute>
</ValCurs>"#;
