//! Binance kline events -> OHLCV rows.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub close_time: DateTime<Utc>,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl Candle {
    /// `close_time,open,high,low,close,volume`, without a trailing newline.
    pub fn to_row(&self) -> String {
        [
            format_close_time(&self.close_time),
            self.open.clone(),
            self.high.clone(),
            self.low.clone(),
            self.close.clone(),
            self.volume.clone(),
        ]
        .join(",")
    }
}

/// `Ok(None)` for messages that carry no kline (subscription acks and the like).
pub fn parse_message(text: &str) -> Result<Option<Candle>> {
    let payload: Value = serde_json::from_str(text).context("message is not JSON")?;

    let kline = match payload.get("k") {
        Some(Value::Object(kline)) if !kline.is_empty() => kline,
        _ => return Ok(None),
    };

    let close_ms = kline
        .get("T")
        .and_then(Value::as_i64)
        .ok_or_else(|| anyhow!("kline has no close time"))?;
    let close_time = DateTime::from_timestamp_millis(close_ms)
        .ok_or_else(|| anyhow!("close time {} is out of range", close_ms))?;

    let field = |key: &str| match kline.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Ok(Some(Candle {
        close_time,
        open: field("o"),
        high: field("h"),
        low: field("l"),
        close: field("c"),
        volume: field("v"),
    }))
}

// RFC 3339 with a +00:00 offset; microseconds only when there are any.
fn format_close_time(time: &DateTime<Utc>) -> String {
    let precision = if time.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    time.to_rfc3339_opts(precision, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "e": "kline", "E": 1672515782136, "s": "BTCUSDT",
        "k": {
            "t": 1672515720000, "T": 1672515779999, "s": "BTCUSDT", "i": "1m",
            "o": "16541.00", "c": "16542.10", "h": "16545.30", "l": "16540.20",
            "v": "12.345", "x": false
        }
    }"#;

    #[test]
    fn parses_kline_into_row() {
        let candle = parse_message(EVENT).unwrap().unwrap();

        assert_eq!(
            candle.to_row(),
            "2022-12-31T19:42:59.999000+00:00,16541.00,16545.30,16540.20,16542.10,12.345"
        );
    }

    #[test]
    fn whole_seconds_have_no_fraction() {
        let candle = parse_message(r#"{"k": {"T": 1672531200000, "o": "1", "h": "2", "l": "0.5", "c": "1.5", "v": 10}}"#)
            .unwrap()
            .unwrap();

        assert_eq!(candle.to_row(), "2023-01-01T00:00:00+00:00,1,2,0.5,1.5,10");
    }

    #[test]
    fn messages_without_kline_are_ignored() {
        assert_eq!(parse_message(r#"{"result": null, "id": 1}"#).unwrap(), None);
        assert_eq!(parse_message(r#"{"k": {}}"#).unwrap(), None);
    }

    #[test]
    fn malformed_messages_are_errors() {
        assert!(parse_message("not json").is_err());
        assert!(parse_message(r#"{"k": {"o": "1"}}"#).is_err());
    }
}
