//! Yahoo Finance chart API 數據源
//!
//! 請求 `/v8/finance/chart/{symbol}` 的日線資料。回應中的時間戳加上
//! `meta.gmtoffset` 後換算為交易所當地的交易日；收盤價優先使用
//! `adjclose`（還原權息），缺值時使用 `quote.close`。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::error::{DataProviderError, DataProviderResult};
use super::loader::{series_from_bars, LookbackWindow, PriceHistoryProvider};
use crate::config::ProviderConfig;
use crate::domain_types::{DailyBar, PriceSeries};
use crate::utils::time_utils::{date_to_unix_seconds, unix_seconds_to_trading_day};

/// 查無商品時 API 回傳的錯誤代碼
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn column_at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

/// 解析 chart API 回應為日線記錄
///
/// API 可能回傳多個結果或多組 quote，只取第一組。
pub fn parse_chart_response(instrument_id: &str, body: &str) -> DataProviderResult<Vec<DailyBar>> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| {
        DataProviderError::InvalidResponse(format!("{} 的 chart 回應無法解析: {}", instrument_id, e))
    })?;

    if let Some(error) = envelope.chart.error {
        let description = error.description.unwrap_or_default();
        return Err(if error.code == NOT_FOUND_CODE {
            DataProviderError::UnknownInstrument(format!("{}: {}", instrument_id, description))
        } else {
            DataProviderError::DataUnavailable(format!(
                "{}: {} {}",
                instrument_id, error.code, description
            ))
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(DataProviderError::DataUnavailable(format!(
            "{} 的 chart 回應沒有結果",
            instrument_id
        )));
    };

    let gmt_offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let indicators = result.indicators.unwrap_or_default();
    let quote = indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = indicators
        .adjclose
        .into_iter()
        .next()
        .unwrap_or_default()
        .adjclose;

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = unix_seconds_to_trading_day(ts, gmt_offset)?;
            Some(DailyBar {
                date,
                open: column_at(&quote.open, i),
                high: column_at(&quote.high, i),
                low: column_at(&quote.low, i),
                close: column_at(&quote.close, i),
                adj_close: column_at(&adjclose, i),
                volume: column_at(&quote.volume, i),
            })
        })
        .collect();

    Ok(bars)
}

/// Yahoo Finance 日線數據源
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    /// 依配置建立 HTTP 客戶端
    pub fn new(config: &ProviderConfig) -> DataProviderResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, instrument_id: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, instrument_id)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooChartProvider {
    async fn fetch(
        &self,
        instrument_id: &str,
        window: &LookbackWindow,
    ) -> DataProviderResult<PriceSeries> {
        let period1 = date_to_unix_seconds(window.start);
        // period2 為不含的上界，加一日以包含結束日
        let period2 = date_to_unix_seconds(window.end) + 86_400;

        debug!(instrument = instrument_id, %window, "請求 Yahoo chart 數據");

        let response = self
            .client
            .get(self.chart_url(instrument_id))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,splits".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(DataProviderError::UnknownInstrument(instrument_id.to_string()));
        }
        if !status.is_success() {
            return Err(DataProviderError::InvalidResponse(format!(
                "{} 的 chart 請求失敗: HTTP {}",
                instrument_id, status
            )));
        }

        let bars = parse_chart_response(instrument_id, &body)?;
        let series = series_from_bars(instrument_id, bars, window)?;

        info!(
            instrument = instrument_id,
            observations = series.len(),
            "Yahoo 歷史價格載入完成"
        );

        Ok(series)
    }
}
