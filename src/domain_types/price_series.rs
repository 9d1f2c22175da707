//! 日線價格序列

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{DomainError, PriceField, Result};

/// 數據源回傳的日線記錄，欄位可能缺值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<f64>,
}

impl DailyBar {
    /// 只有收盤價的日線記錄
    pub fn with_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: Some(close),
            adj_close: None,
            volume: None,
        }
    }

    /// 讀取指定價格欄位，NaN 視為缺值
    pub fn price(&self, field: PriceField) -> Option<f64> {
        let value = match field {
            PriceField::Close => self.close,
            PriceField::AdjustedClose => self.adj_close,
        };
        value.filter(|v| !v.is_nan())
    }

    /// 優先使用還原收盤價，缺值時退回原始收盤價
    pub fn preferred_close(&self) -> Option<f64> {
        self.price(PriceField::AdjustedClose)
            .or_else(|| self.price(PriceField::Close))
    }
}

/// 單一交易日的收盤價
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// 單一商品按日期遞增排列的收盤價序列
///
/// 建構時保證日期嚴格遞增（無重複交易日）。價格本身的合法性
/// 由報酬統計計算時檢查。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    instrument_id: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 從已排序的價格點創建序列
    pub fn new(instrument_id: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let instrument_id = instrument_id.into();

        if let Some(pair) = points.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(DomainError::TimeSeriesError(format!(
                "{} 的交易日必須嚴格遞增: {} 之後出現 {}",
                instrument_id, pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            instrument_id,
            points,
        })
    }

    /// 從日線記錄抽取收盤價欄位
    ///
    /// 記錄會先依日期排序，同一交易日只保留最後一筆；沒有可用收盤價的
    /// 記錄直接丟棄。
    pub fn from_bars(instrument_id: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);

        let mut points: Vec<PricePoint> = Vec::with_capacity(bars.len());
        for bar in bars {
            let Some(close) = bar.preferred_close() else {
                continue;
            };
            let point = PricePoint {
                date: bar.date,
                close,
            };
            match points.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => points.push(point),
            }
        }

        Self {
            instrument_id: instrument_id.into(),
            points,
        }
    }

    pub fn instrument_id(&self) -> &str {
        &self.instrument_id
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 依時間順序迭代收盤價
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// 獲取數據點數量
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 檢查是否為空
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 最後一個交易日
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_new_rejects_unsorted_points() {
        let points = vec![
            PricePoint { date: day(2), close: 10.0 },
            PricePoint { date: day(1), close: 11.0 },
        ];
        assert!(PriceSeries::new("ES=F", points).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_days() {
        let points = vec![
            PricePoint { date: day(1), close: 10.0 },
            PricePoint { date: day(1), close: 11.0 },
        ];
        let err = PriceSeries::new("ES=F", points).unwrap_err();
        assert!(matches!(err, DomainError::TimeSeriesError(_)));
    }

    #[test]
    fn test_from_bars_sorts_and_keeps_last_duplicate() {
        let bars = vec![
            DailyBar::with_close(day(3), 30.0),
            DailyBar::with_close(day(1), 10.0),
            DailyBar::with_close(day(3), 31.0),
            DailyBar::with_close(day(2), 20.0),
        ];
        let series = PriceSeries::from_bars("NQ=F", bars);

        assert_eq!(series.instrument_id(), "NQ=F");
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![10.0, 20.0, 31.0]);
        assert_eq!(series.last().map(|p| p.date), Some(day(3)));
    }

    #[test]
    fn test_from_bars_prefers_adjusted_close_and_drops_missing() {
        let mut adjusted = DailyBar::with_close(day(1), 100.0);
        adjusted.adj_close = Some(98.5);

        let mut nan_adjusted = DailyBar::with_close(day(2), 101.0);
        nan_adjusted.adj_close = Some(f64::NAN);

        let mut missing = DailyBar::with_close(day(3), 0.0);
        missing.close = None;

        let series = PriceSeries::from_bars("ES=F", vec![adjusted, nan_adjusted, missing]);

        assert_eq!(series.closes().collect::<Vec<_>>(), vec![98.5, 101.0]);
        assert_eq!(series.last_price(), Some(101.0));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::from_bars("ES=F", Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.last_price(), None);
    }
}
