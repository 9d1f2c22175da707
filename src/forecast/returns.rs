//! 報酬統計計算
//!
//! 將收盤價序列轉為單期簡單報酬 `p_t / p_{t-1} - 1`，再計算平均值與
//! 母體標準差（除以 N 而非 N-1）。

use statrs::statistics::Statistics;
use tracing::debug;

use super::error::{ForecastError, ForecastResult};
use crate::domain_types::{PriceSeries, ReturnStats};

/// 計算至少一筆報酬所需的最少價格筆數
pub const MIN_OBSERVATIONS: usize = 2;

/// 逐對計算簡單報酬，長度為 `closes.len() - 1`
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|pair| pair[1] / pair[0] - 1.0).collect()
}

/// 從價格序列計算報酬統計量
pub fn extract(series: &PriceSeries) -> ForecastResult<ReturnStats> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }

    if let Some(bad) = series
        .points()
        .iter()
        .find(|p| !p.close.is_finite() || p.close <= 0.0)
    {
        return Err(ForecastError::InvalidPrice {
            context: format!("{} 於 {}", series.instrument_id(), bad.date),
            value: bad.close,
        });
    }

    let closes: Vec<f64> = series.closes().collect();
    let returns = simple_returns(&closes);
    let stats = summarize_returns(&returns);

    // 相鄰價格比例溢位時統計量不再是有限數值
    if !stats.mean.is_finite() || !stats.std_dev.is_finite() {
        return Err(ForecastError::InvalidPrice {
            context: format!("{} 的報酬統計溢位", series.instrument_id()),
            value: if stats.mean.is_finite() {
                stats.std_dev
            } else {
                stats.mean
            },
        });
    }

    debug!(
        instrument = series.instrument_id(),
        observations = series.len(),
        mean = stats.mean,
        std_dev = stats.std_dev,
        "報酬統計計算完成"
    );

    Ok(stats)
}

/// 非空報酬序列的平均值與母體標準差
fn summarize_returns(returns: &[f64]) -> ReturnStats {
    let first = returns[0];

    // 所有比率相同時直接回傳零波動，避免累加誤差留下極小的標準差
    if returns.iter().all(|r| *r == first) {
        return ReturnStats::new(first, 0.0);
    }

    let mean = returns.iter().mean();
    let std_dev = returns.iter().population_std_dev();

    ReturnStats::new(mean, std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::PricePoint;
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rstest::rstest;

    fn series_of(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn test_simple_returns_length_and_values() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_dev_uses_n_divisor() {
        // 報酬: +25%, -20% -> 平均 0.025, 母體標準差 0.225
        let stats = extract(&series_of(&[100.0, 125.0, 100.0])).unwrap();
        assert!((stats.mean - 0.025).abs() < 1e-12);
        assert!((stats.std_dev - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_has_zero_mean_and_std() {
        let stats = extract(&series_of(&[50.0; 30])).unwrap();
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_equal_ratios_give_exact_zero_std() {
        let stats = extract(&series_of(&[100.0, 200.0, 400.0, 800.0])).unwrap();
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.std_dev, 0.0);

        let stats = extract(&series_of(&[64.0, 80.0, 100.0, 125.0, 156.25])).unwrap();
        assert_eq!(stats.mean, 0.25);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[100.0])]
    fn test_short_series_rejected(#[case] closes: &[f64]) {
        let err = extract(&series_of(closes)).unwrap_err();
        assert_matches!(
            err,
            ForecastError::InsufficientData { required: 2, actual } if actual == closes.len()
        );
    }

    #[rstest]
    #[case(&[100.0, 0.0, 101.0])]
    #[case(&[100.0, -5.0])]
    #[case(&[100.0, f64::NAN, 101.0])]
    #[case(&[f64::INFINITY, 100.0])]
    fn test_invalid_prices_rejected(#[case] closes: &[f64]) {
        let err = extract(&series_of(closes)).unwrap_err();
        assert_matches!(err, ForecastError::InvalidPrice { .. });
    }

    #[rstest]
    #[case(&[1e-300, 1e300])]
    #[case(&[1e-300, 1e300, 1.0])]
    fn test_overflowing_ratios_rejected(#[case] closes: &[f64]) {
        let err = extract(&series_of(closes)).unwrap_err();
        assert_matches!(err, ForecastError::InvalidPrice { .. });
    }

    proptest! {
        #[test]
        fn prop_std_dev_is_non_negative(closes in prop::collection::vec(0.01f64..10_000.0, 2..200)) {
            let stats = extract(&series_of(&closes)).unwrap();
            prop_assert!(stats.std_dev >= 0.0);
            prop_assert!(stats.mean.is_finite());
        }

        #[test]
        fn prop_constant_series_is_flat(start in 1.0f64..1000.0, len in 2usize..60) {
            let stats = extract(&series_of(&vec![start; len])).unwrap();
            prop_assert_eq!(stats.std_dev, 0.0);
            prop_assert_eq!(stats.mean, 0.0);
        }

        #[test]
        fn prop_equal_ratios_have_zero_std(
            start in 1.0f64..1000.0,
            ratio in prop::sample::select(vec![0.5f64, 2.0, 4.0]),
            len in 2usize..20,
        ) {
            let closes: Vec<f64> = (0..len).map(|i| start * ratio.powi(i as i32)).collect();
            let stats = extract(&series_of(&closes)).unwrap();
            prop_assert_eq!(stats.std_dev, 0.0);
        }
    }
}
