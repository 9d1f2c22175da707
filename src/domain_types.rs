pub mod types;
pub mod price_series;
pub mod forecast;

pub use types::{ColumnName, DomainError, PriceField};
pub use price_series::{DailyBar, PricePoint, PriceSeries};
pub use forecast::{
    ForecastBatch, ForecastRecord, Percentile, PercentileBands, ReturnStats, SimulationResult,
    Trend,
};
