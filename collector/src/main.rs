//! Streams Binance klines for one symbol/interval into an append-only CSV file.

mod kline;
mod sink;

use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use std::path::PathBuf;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::sink::CandleSink;

const STREAM_BASE: &str = "wss://stream.binance.com:9443/ws";

#[derive(Debug, Clone, PartialEq)]
struct CollectorConfig {
    symbol: String,
    interval: String,
    data_path: PathBuf,
}

impl CollectorConfig {
    fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            symbol: get("BINANCE_SYMBOL", "btcusdt").to_lowercase(),
            interval: get("BINANCE_INTERVAL", "1m"),
            data_path: PathBuf::from(get("DATA_PATH", "/data")),
        }
    }

    fn stream_url(&self) -> String {
        format!("{}/{}@kline_{}", STREAM_BASE, self.symbol, self.interval)
    }

    fn output_file(&self) -> PathBuf {
        self.data_path.join(format!("{}_klines.csv", self.symbol))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = CollectorConfig::from_env();
    stream_candles(&config).await
}

async fn stream_candles(config: &CollectorConfig) -> Result<()> {
    let mut sink = CandleSink::open(&config.output_file()).await?;
    info!("Appending candles to {}", sink.path().display());

    let url = config.stream_url();
    let (mut stream, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;
    info!("Subscribed to {}", url);

    // Pings are answered by tungstenite itself while we read.
    while let Some(message) = stream.next().await {
        match message.context("Market data stream failed")? {
            Message::Text(text) => match kline::parse_message(&text) {
                Ok(Some(candle)) => sink.append(&candle).await?,
                Ok(None) => debug!("Ignoring non-kline message"),
                Err(e) => warn!("Skipping malformed kline: {:#}", e),
            },
            Message::Close(frame) => {
                info!("Stream closed by server: {:?}", frame);
                break;
            }
            _ => {}
        }
    }

    bail!("Market data stream ended")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_public_stream() {
        let config = CollectorConfig::from_lookup(|_| None);

        assert_eq!(config.stream_url(), "wss://stream.binance.com:9443/ws/btcusdt@kline_1m");
        assert_eq!(config.output_file(), PathBuf::from("/data/btcusdt_klines.csv"));
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BINANCE_SYMBOL", "ETHUSDT"),
            ("BINANCE_INTERVAL", "5m"),
            ("DATA_PATH", "/tmp/candles"),
        ]
        .into_iter()
        .collect();
        let config = CollectorConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.stream_url(), "wss://stream.binance.com:9443/ws/ethusdt@kline_5m");
        assert_eq!(config.output_file(), PathBuf::from("/tmp/candles/ethusdt_klines.csv"));
    }
}
