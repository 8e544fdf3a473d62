use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use super::{Requester, PRICE_HISTORY_PATH};
use crate::{Error, Result};

/// One hourly (or daily, for older data) observation of an item's price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub timestamp: DateTime<Utc>,
    /// Kept as the server formatted it, to avoid rounding.
    pub price: String,
    pub volume: u64,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    prices: Vec<(String, Scalar, Scalar)>,
}

/// The market is not consistent about quoting numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Parses the market's `"Jan 05 2023 14: +0"` timestamps.
///
/// The `+0` offset is always zero, so the result is the given hour in UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    // chrono wants minutes, the market only reports hours
    NaiveDateTime::parse_from_str(&format!("{raw}00"), "%b %d %Y %H: +0%M")
        .map(|t| t.and_utc())
        .map_err(|source| Error::InvalidTimestamp {
            raw: raw.to_string(),
            source,
        })
}

#[derive(Debug, Clone)]
pub struct HistoryClient {
    requester: Requester,
}

impl HistoryClient {
    pub fn new(requester: Requester) -> Self {
        Self { requester }
    }

    /// Loads the full price history of a single item.
    ///
    /// When the market answers `success: false` for this item (delisted,
    /// renamed, ...) `None` is returned so the caller can move on. Failing to
    /// reach the market at all is still an error.
    #[tracing::instrument(skip(self))]
    pub async fn price_history(
        &self,
        item: &str,
        app_id: u32,
    ) -> Result<Option<Vec<PriceRecord>>> {
        let params = [
            ("appid", app_id.to_string()),
            ("market_hash_name", item.to_string()),
        ];

        let raw = self.requester.fetch(PRICE_HISTORY_PATH, &params).await?;

        let success = raw
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !success {
            tracing::warn!(payload = %raw, "Failed to get price history, skipping");
            return Ok(None);
        }

        let content: HistoryResponse =
            serde_json::from_value(raw).map_err(|source| Error::MalformedResponse {
                url: PRICE_HISTORY_PATH.to_string(),
                source,
            })?;

        let records = content
            .prices
            .into_iter()
            .map(|(day, price, count)| -> Result<PriceRecord> {
                let count = count.into_text();
                let volume = count.parse::<u64>().map_err(|_| Error::InvalidField {
                    field: "sold count",
                    value: count.clone(),
                })?;

                Ok(PriceRecord {
                    timestamp: parse_timestamp(&day)?,
                    price: price.into_text(),
                    volume,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Loaded {} price points", records.len());

        Ok(Some(records))
    }
}
