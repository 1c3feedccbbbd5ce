use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::kline::Candle;

/// Append-only CSV file. Every row is flushed before `append` returns.
pub struct CandleSink {
    path: PathBuf,
    file: File,
}

impl CandleSink {
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&mut self, candle: &Candle) -> Result<()> {
        let mut row = candle.to_row();
        row.push('\n');
        self.file.write_all(row.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kline::parse_message;
    use tempfile::tempdir;

    fn candle(close_ms: i64, close: &str) -> Candle {
        let text = format!(
            r#"{{"k": {{"T": {}, "o": "1", "h": "2", "l": "0.5", "c": "{}", "v": "3"}}}}"#,
            close_ms, close
        );
        parse_message(&text).unwrap().unwrap()
    }

    #[tokio::test]
    async fn appends_rows_across_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("btcusdt_klines.csv");

        let mut sink = CandleSink::open(&path).await.unwrap();
        sink.append(&candle(1672531200000, "1.5")).await.unwrap();
        drop(sink);

        let mut sink = CandleSink::open(&path).await.unwrap();
        sink.append(&candle(1672531260000, "1.6")).await.unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(
            contents,
            "2023-01-01T00:00:00+00:00,1,2,0.5,1.5,3\n2023-01-01T00:01:00+00:00,1,2,0.5,1.6,3\n"
        );
    }
}
