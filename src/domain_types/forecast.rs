//! 預測結果相關的領域類型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 單期簡單報酬的統計量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    /// 報酬平均值
    pub mean: f64,
    /// 母體標準差（除以 N）
    pub std_dev: f64,
}

impl ReturnStats {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// 報告使用的五個百分位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Percentile {
    P1,
    P5,
    P50,
    P95,
    P99,
}

impl Percentile {
    /// 依等級由低到高排列
    pub const ALL: [Percentile; 5] = [
        Percentile::P1,
        Percentile::P5,
        Percentile::P50,
        Percentile::P95,
        Percentile::P99,
    ];

    /// 百分位等級 (0-100)
    pub fn rank(&self) -> f64 {
        match self {
            Percentile::P1 => 1.0,
            Percentile::P5 => 5.0,
            Percentile::P50 => 50.0,
            Percentile::P95 => 95.0,
            Percentile::P99 => 99.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Percentile::P1 => "P1",
            Percentile::P5 => "P5",
            Percentile::P50 => "P50",
            Percentile::P95 => "P95",
            Percentile::P99 => "P99",
        }
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 模擬價格分佈的百分位帶
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    pub p1: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl PercentileBands {
    /// 所有百分位都等於同一個值
    pub fn flat(value: f64) -> Self {
        Self {
            p1: value,
            p5: value,
            p50: value,
            p95: value,
            p99: value,
        }
    }

    pub fn get(&self, percentile: Percentile) -> f64 {
        match percentile {
            Percentile::P1 => self.p1,
            Percentile::P5 => self.p5,
            Percentile::P50 => self.p50,
            Percentile::P95 => self.p95,
            Percentile::P99 => self.p99,
        }
    }

    /// 依等級順序回傳 (百分位, 值)
    pub fn iter(&self) -> impl Iterator<Item = (Percentile, f64)> + '_ {
        Percentile::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// p1 <= p5 <= p50 <= p95 <= p99
    pub fn is_ordered(&self) -> bool {
        self.p1 <= self.p5 && self.p5 <= self.p50 && self.p50 <= self.p95 && self.p95 <= self.p99
    }

    /// 上下尾端寬度 (p99 - p1)
    pub fn tail_spread(&self) -> f64 {
        self.p99 - self.p1
    }
}

/// 蒙地卡羅模擬的摘要結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub percentiles: PercentileBands,
    /// 模擬價格的算術平均
    pub expected_price: f64,
    pub sample_size: usize,
}

/// 預期價格相對於最新收盤價的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Bullish, // 預期價格 >= 最新收盤
    Bearish, // 預期價格 < 最新收盤
}

impl Trend {
    pub fn from_prices(last_price: f64, expected_price: f64) -> Self {
        if expected_price < last_price {
            Trend::Bearish
        } else {
            Trend::Bullish
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
        }
    }
}

/// 單一商品的預測記錄，組裝後不可修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    instrument_id: String,
    target_date: NaiveDate,
    last_price: f64,
    expected_price: f64,
    annualized_volatility_pct: f64,
    percentiles: PercentileBands,
}

impl ForecastRecord {
    pub fn new(
        instrument_id: impl Into<String>,
        target_date: NaiveDate,
        last_price: f64,
        expected_price: f64,
        annualized_volatility_pct: f64,
        percentiles: PercentileBands,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            target_date,
            last_price,
            expected_price,
            annualized_volatility_pct,
            percentiles,
        }
    }

    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    pub fn expected_price(&self) -> f64 {
        self.expected_price
    }

    pub fn annualized_volatility_pct(&self) -> f64 {
        self.annualized_volatility_pct
    }

    pub fn percentiles(&self) -> &PercentileBands {
        &self.percentiles
    }

    pub fn trend(&self) -> Trend {
        Trend::from_prices(self.last_price, self.expected_price)
    }
}

/// 一次執行產生的預測記錄集合，保持商品處理順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastBatch {
    records: Vec<ForecastRecord>,
}

impl ForecastBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ForecastRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ForecastRecord> for ForecastBatch {
    fn from_iter<I: IntoIterator<Item = ForecastRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ForecastBatch {
    type Item = &'a ForecastRecord;
    type IntoIter = std::slice::Iter<'a, ForecastRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
