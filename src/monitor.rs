// monitor.rs - 監控指標模組

pub mod metrics;

pub use metrics::{ForecastMetrics, InstrumentOutcome, PublishOutcome, METRIC_NAMESPACE};
