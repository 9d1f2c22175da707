//! 蒙地卡羅單步價格模擬
//!
//! 從常態分佈 `N(mean, std_dev)` 抽取模擬報酬，以 `last_price * (1 + r)`
//! 換算為下一期價格，再摘要為平均值與百分位帶。價格換算只適用於單步
//! 預測，不做多日複利。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use statrs::statistics::Statistics;

use super::error::{ForecastError, ForecastResult};
use super::percentile::{percentile_bands, sort_samples};
use crate::domain_types::{ReturnStats, SimulationResult};

/// 預設模擬次數
pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;
/// 預設預測步數（只使用第一步）
pub const DEFAULT_HORIZON_DAYS: u32 = 1;

/// 模擬參數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloConfig {
    pub sample_size: usize,
    pub horizon_days: u32,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl MonteCarloConfig {
    fn validate(&self) -> ForecastResult<()> {
        if self.sample_size < 1 {
            return Err(ForecastError::InvalidParameter(
                "sample_size 必須至少為 1".to_string(),
            ));
        }
        if self.horizon_days < 1 {
            return Err(ForecastError::InvalidParameter(
                "horizon_days 必須至少為 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 蒙地卡羅預測器
#[derive(Debug, Clone)]
pub struct MonteCarloForecaster {
    config: MonteCarloConfig,
}

impl MonteCarloForecaster {
    /// 創建預測器並驗證參數
    pub fn new(config: MonteCarloConfig) -> ForecastResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// 以指定亂數來源模擬下一期價格分佈
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        last_price: f64,
        stats: &ReturnStats,
        rng: &mut R,
    ) -> ForecastResult<SimulationResult> {
        simulate(
            last_price,
            stats,
            self.config.sample_size,
            self.config.horizon_days,
            rng,
        )
    }
}

/// 模擬下一期價格分佈
///
/// `std_dev == 0` 時所有抽樣都等於 `mean`，不消耗亂數。
pub fn simulate<R: Rng + ?Sized>(
    last_price: f64,
    stats: &ReturnStats,
    sample_size: usize,
    horizon_days: u32,
    rng: &mut R,
) -> ForecastResult<SimulationResult> {
    MonteCarloConfig {
        sample_size,
        horizon_days,
    }
    .validate()?;

    if !last_price.is_finite() || last_price <= 0.0 {
        return Err(ForecastError::InvalidPrice {
            context: "最新收盤價".to_string(),
            value: last_price,
        });
    }

    let returns = draw_first_step_returns(stats, sample_size, horizon_days, rng)?;
    let mut prices: Vec<f64> = returns.iter().map(|r| last_price * (1.0 + r)).collect();

    let expected_price = prices.iter().mean();
    sort_samples(&mut prices);
    let percentiles = percentile_bands(&prices).ok_or_else(|| {
        ForecastError::Sampling("模擬樣本為空".to_string())
    })?;

    Ok(SimulationResult {
        percentiles,
        expected_price,
        sample_size,
    })
}

/// 每條路徑抽取 `horizon_days` 步報酬，只保留第一步
fn draw_first_step_returns<R: Rng + ?Sized>(
    stats: &ReturnStats,
    sample_size: usize,
    horizon_days: u32,
    rng: &mut R,
) -> ForecastResult<Vec<f64>> {
    if !stats.mean.is_finite() {
        return Err(ForecastError::Sampling(format!(
            "報酬平均值必須為有限數值: {}",
            stats.mean
        )));
    }

    // Normal::new 只檢查有限性，負值需自行拒絕
    if !stats.std_dev.is_finite() || stats.std_dev < 0.0 {
        return Err(ForecastError::Sampling(format!(
            "報酬標準差必須為非負有限數值: {}",
            stats.std_dev
        )));
    }

    if stats.std_dev == 0.0 {
        return Ok(vec![stats.mean; sample_size]);
    }

    let normal = Normal::new(stats.mean, stats.std_dev)
        .map_err(|e| ForecastError::Sampling(format!("無法建立常態分佈: {}", e)))?;

    let mut first_steps = Vec::with_capacity(sample_size);
    for _ in 0..sample_size {
        first_steps.push(normal.sample(rng));
        for _ in 1..horizon_days {
            let _ = normal.sample(rng);
        }
    }

    Ok(first_steps)
}

/// 為第 `stream` 個商品建立獨立亂數來源
///
/// 有種子時結果可重現；沒有種子時使用作業系統熵源。
pub fn instrument_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15)),
        None => StdRng::from_os_rng(),
    }
}
