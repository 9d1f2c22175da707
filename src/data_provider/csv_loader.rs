//! 本地 CSV 數據源
//!
//! 每個商品一個檔案 `<directory>/<instrument_id>.csv`。欄位名稱不分大小寫，
//! 空白視為底線，因此 `Adj Close` 與 `adj_close` 相同。至少需要
//! `date` 與 `close` 欄位。

use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{DataProviderError, DataProviderResult};
use super::loader::{series_from_bars, LookbackWindow, PriceHistoryProvider};
use crate::domain_types::{ColumnName, DailyBar, DomainError, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    adj_close: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// 解析日期欄位，接受 `YYYY-MM-DD` 或帶時間的 `YYYY-MM-DD HH:MM:SS`
fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DomainError::InvalidDataFormat(format!("無法解析日期 '{}': {}", raw, e)))
}

/// 解析 CSV 內容為日線記錄
pub fn parse_csv_bars(content: &str) -> DataProviderResult<Vec<DailyBar>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();
    for required in ColumnName::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(DomainError::MissingRequiredField(required.to_string()).into());
        }
    }
    reader.set_headers(headers);

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        bars.push(DailyBar {
            date: parse_date(&row.date)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close,
            volume: row.volume,
        });
    }

    Ok(bars)
}

/// 從本地目錄讀取日線 CSV 的數據源
pub struct CsvPriceProvider {
    directory: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, instrument_id: &str) -> PathBuf {
        self.directory.join(format!("{}.csv", instrument_id))
    }
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceProvider {
    async fn fetch(
        &self,
        instrument_id: &str,
        window: &LookbackWindow,
    ) -> DataProviderResult<PriceSeries> {
        let path = self.file_path(instrument_id);
        debug!(instrument = instrument_id, path = %path.display(), "讀取 CSV 價格檔");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataProviderError::UnknownInstrument(format!(
                    "{}（找不到 {}）",
                    instrument_id,
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let bars = parse_csv_bars(&content)?;
        let series = series_from_bars(instrument_id, bars, window)?;

        info!(
            instrument = instrument_id,
            observations = series.len(),
            "CSV 歷史價格載入完成"
        );

        Ok(series)
    }
}
