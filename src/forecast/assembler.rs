use chrono::NaiveDate;

use crate::domain_types::{ForecastRecord, ReturnStats, SimulationResult};

/// 年化使用的每年交易日數
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 日報酬母體標準差換算為年化波動率百分比
pub fn annualized_volatility_pct(daily_std_dev: f64) -> f64 {
    daily_std_dev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// 將單一商品的計算結果組裝為預測記錄
pub fn assemble(
    instrument_id: &str,
    last_price: f64,
    stats: &ReturnStats,
    result: &SimulationResult,
    target_date: NaiveDate,
) -> ForecastRecord {
    ForecastRecord::new(
        instrument_id,
        target_date,
        last_price,
        result.expected_price,
        annualized_volatility_pct(stats.std_dev),
        result.percentiles,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::{PercentileBands, Trend};

    #[test]
    fn test_annualized_volatility() {
        assert_eq!(annualized_volatility_pct(0.0), 0.0);
        let vol = annualized_volatility_pct(0.01);
        assert!((vol - 15.874507866387544).abs() < 1e-9);
    }

    #[test]
    fn test_assemble_copies_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let stats = ReturnStats::new(0.001, 0.02);
        let bands = PercentileBands {
            p1: 95.0,
            p5: 96.5,
            p50: 100.1,
            p95: 103.4,
            p99: 104.9,
        };
        let result = SimulationResult {
            percentiles: bands,
            expected_price: 99.5,
            sample_size: 100,
        };

        let record = assemble("ES=F", 100.0, &stats, &result, date);

        assert_eq!(record.instrument_id(), "ES=F");
        assert_eq!(record.target_date(), date);
        assert_eq!(record.last_price(), 100.0);
        assert_eq!(record.expected_price(), 99.5);
        assert_eq!(record.percentiles(), &bands);
        assert!((record.annualized_volatility_pct() - annualized_volatility_pct(0.02)).abs() < 1e-12);
        assert_eq!(record.trend(), Trend::Bearish);
    }
}
