//! 預測面板 - 將預測記錄格式化為兩位小數的顯示字串

use serde::Serialize;

use crate::domain_types::{ForecastRecord, Trend};

/// 價格顯示格式，固定兩位小數
pub fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

/// 單一商品的顯示面板
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPanel {
    pub instrument_id: String,
    pub target_date: String,
    pub last_price: String,
    pub expected_price: String,
    pub annualized_volatility: String,
    pub p1: String,
    pub p5: String,
    pub p50: String,
    pub p95: String,
    pub p99: String,
    pub trend: Trend,
}

impl From<&ForecastRecord> for ForecastPanel {
    fn from(record: &ForecastRecord) -> Self {
        let bands = record.percentiles();
        Self {
            instrument_id: record.instrument_id().to_string(),
            target_date: record.target_date().format("%Y-%m-%d").to_string(),
            last_price: format_price(record.last_price()),
            expected_price: format_price(record.expected_price()),
            annualized_volatility: format!("{:.2}%", record.annualized_volatility_pct()),
            p1: format_price(bands.p1),
            p5: format_price(bands.p5),
            p50: format_price(bands.p50),
            p95: format_price(bands.p95),
            p99: format_price(bands.p99),
            trend: record.trend(),
        }
    }
}
