use async_trait::async_trait;
use tracing::info;

use super::error::PublishResult;
use super::panel::ForecastPanel;
use super::ReportPublisher;
use crate::domain_types::{ForecastBatch, Trend};

/// 將預測面板輸出到標準輸出（試跑用）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePublisher;

impl ConsolePublisher {
    pub fn new() -> Self {
        Self
    }

    /// 渲染單一面板
    pub fn render_panel(panel: &ForecastPanel) -> String {
        let marker = match panel.trend {
            Trend::Bullish => "▲",
            Trend::Bearish => "▼",
        };
        format!(
            "{marker} {id} @ {date}\n  \
             Last close: {last}\n  \
             Expected:   {expected}\n  \
             Annual vol: {vol}\n  \
             P1 {p1} | P5 {p5} | P50 {p50} | P95 {p95} | P99 {p99}",
            marker = marker,
            id = panel.instrument_id,
            date = panel.target_date,
            last = panel.last_price,
            expected = panel.expected_price,
            vol = panel.annualized_volatility,
            p1 = panel.p1,
            p5 = panel.p5,
            p50 = panel.p50,
            p95 = panel.p95,
            p99 = panel.p99,
        )
    }

    pub fn render(batch: &ForecastBatch) -> String {
        batch
            .iter()
            .map(|record| Self::render_panel(&ForecastPanel::from(record)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl ReportPublisher for ConsolePublisher {
    async fn publish(&self, batch: &ForecastBatch) -> PublishResult<()> {
        println!("{}", Self::render(batch));
        info!(records = batch.len(), "預測報告已輸出到終端");
        Ok(())
    }
}
