use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{DataProviderError, DataProviderResult};
use crate::domain_types::{DailyBar, PriceSeries};
use crate::utils::time_utils::lookback_start;

/// 歷史價格回溯區間（含首尾日期）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LookbackWindow {
    /// 以 `end` 為結束日往前回溯 `lookback_days` 個日曆日
    pub fn ending_at(end: NaiveDate, lookback_days: u32) -> Self {
        Self {
            start: lookback_start(end, lookback_days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// 價格數據源特性 - 依商品代碼與回溯區間提供日收盤價序列
///
/// 實作負責處理各數據源的格式差異，回傳的序列只包含一個收盤價欄位。
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// 獲取指定商品在回溯區間內的日收盤價
    async fn fetch(
        &self,
        instrument_id: &str,
        window: &LookbackWindow,
    ) -> DataProviderResult<PriceSeries>;
}

/// 將數據源的日線記錄轉為價格序列，沒有可用收盤價時回報無數據
pub(crate) fn series_from_bars(
    instrument_id: &str,
    bars: Vec<DailyBar>,
    window: &LookbackWindow,
) -> DataProviderResult<PriceSeries> {
    let in_window: Vec<DailyBar> = bars
        .into_iter()
        .filter(|bar| window.contains(bar.date))
        .collect();

    let series = PriceSeries::from_bars(instrument_id, in_window);
    if series.is_empty() {
        return Err(DataProviderError::DataUnavailable(format!(
            "{} 在 {} 區間內沒有收盤價",
            instrument_id, window
        )));
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_window_contains_bounds() {
        let window = LookbackWindow::ending_at(date(6, 30), 29);
        assert_eq!(window.start, date(6, 1));
        assert!(window.contains(date(6, 1)));
        assert!(window.contains(date(6, 30)));
        assert!(!window.contains(date(5, 31)));
        assert!(!window.contains(date(7, 1)));
    }

    #[test]
    fn test_series_from_bars_filters_window() {
        let window = LookbackWindow::ending_at(date(6, 30), 29);
        let bars = vec![
            DailyBar::with_close(date(5, 31), 1.0),
            DailyBar::with_close(date(6, 3), 2.0),
            DailyBar::with_close(date(6, 4), 3.0),
        ];
        let series = series_from_bars("ES=F", bars, &window).unwrap();
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_series_from_bars_empty_is_unavailable() {
        let window = LookbackWindow::ending_at(date(6, 30), 29);
        let mut bar = DailyBar::with_close(date(6, 3), 2.0);
        bar.close = None;
        let err = series_from_bars("ES=F", vec![bar], &window).unwrap_err();
        assert_matches!(err, DataProviderError::DataUnavailable(_));
    }
}
