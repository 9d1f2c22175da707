use metrics::{counter, histogram};
use std::time::Duration;

/// 監控指標命名空間
pub const METRIC_NAMESPACE: &str = "quant_engine";

/// 單一商品的處理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentOutcome {
    Forecasted,
    /// 在指定階段失敗而被略過
    Skipped { stage: &'static str },
}

/// 發布結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    Skipped,
    Failed,
}

impl PublishOutcome {
    fn as_label(&self) -> &'static str {
        match self {
            PublishOutcome::Published => "published",
            PublishOutcome::Skipped => "skipped",
            PublishOutcome::Failed => "failed",
        }
    }
}

/// 預測流程監控指標記錄器
///
/// 未安裝 recorder 時巨集不做任何事。
pub struct ForecastMetrics;

impl ForecastMetrics {
    /// 記錄單一商品的處理結果
    pub fn record_instrument(outcome: InstrumentOutcome) {
        match outcome {
            InstrumentOutcome::Forecasted => {
                counter!(
                    format!("{}.instrument", METRIC_NAMESPACE),
                    "result" => "forecasted"
                )
                .increment(1);
            }
            InstrumentOutcome::Skipped { stage } => {
                counter!(
                    format!("{}.instrument", METRIC_NAMESPACE),
                    "result" => "skipped",
                    "stage" => stage
                )
                .increment(1);
            }
        }
    }

    /// 記錄單次模擬耗時
    pub fn record_simulation(sample_size: usize, duration: Duration) {
        histogram!(format!("{}.simulation_latency_ns", METRIC_NAMESPACE))
            .record(duration.as_nanos() as f64);
        counter!(format!("{}.simulated_samples", METRIC_NAMESPACE)).increment(sample_size as u64);
    }

    /// 記錄發布結果
    pub fn record_publish(outcome: PublishOutcome, records: usize) {
        counter!(
            format!("{}.publish", METRIC_NAMESPACE),
            "result" => outcome.as_label()
        )
        .increment(1);
        histogram!(format!("{}.batch_size", METRIC_NAMESPACE)).record(records as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        ForecastMetrics::record_instrument(InstrumentOutcome::Forecasted);
        ForecastMetrics::record_instrument(InstrumentOutcome::Skipped { stage: "fetch" });
        ForecastMetrics::record_simulation(10_000, Duration::from_millis(3));
        ForecastMetrics::record_publish(PublishOutcome::Skipped, 0);
    }

    #[test]
    fn test_publish_labels() {
        assert_eq!(PublishOutcome::Published.as_label(), "published");
        assert_eq!(PublishOutcome::Failed.as_label(), "failed");
    }
}
