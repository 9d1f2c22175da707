// forecast.rs - 預測引擎模組
//
// 由三個純計算元件組成，依序執行：
// - returns: 價格序列 -> 報酬平均值與母體標準差
// - monte_carlo: 報酬統計 -> 下一期模擬價格的平均值與百分位
// - assembler: 單一商品結果 -> 預測記錄

pub mod assembler;
pub mod error;
pub mod monte_carlo;
pub mod percentile;
pub mod returns;

pub use assembler::{annualized_volatility_pct, assemble, TRADING_DAYS_PER_YEAR};
pub use error::{ForecastError, ForecastResult};
pub use monte_carlo::{
    instrument_rng, simulate, MonteCarloConfig, MonteCarloForecaster, DEFAULT_HORIZON_DAYS,
    DEFAULT_SAMPLE_SIZE,
};
pub use percentile::{percentile_bands, percentile_of_sorted};
pub use returns::{extract, simple_returns, MIN_OBSERVATIONS};
