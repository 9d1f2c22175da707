use chrono::NaiveDate;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::error::{PipelineError, PipelineResult};
use crate::config::ForecastConfig;
use crate::data_provider::{LookbackWindow, PriceHistoryProvider};
use crate::domain_types::{ForecastBatch, ForecastRecord};
use crate::forecast::{self, instrument_rng, ForecastError, MonteCarloForecaster};
use crate::monitor::{ForecastMetrics, InstrumentOutcome, PublishOutcome};
use crate::report::ReportPublisher;
use crate::utils::time_utils::target_date;

/// 批次發布結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publication {
    Published,
    /// 批次為空，未呼叫發布者
    Skipped,
    Failed(String),
}

/// 被略過的商品與原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFailure {
    pub instrument_id: String,
    pub stage: &'static str,
    pub reason: String,
}

/// 一次執行的結果摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub batch: ForecastBatch,
    pub failures: Vec<InstrumentFailure>,
    pub publication: Publication,
}

impl RunSummary {
    pub fn forecasted(&self) -> usize {
        self.batch.len()
    }

    pub fn skipped(&self) -> usize {
        self.failures.len()
    }
}

/// 預測流程執行器
pub struct ForecastPipeline {
    provider: Arc<dyn PriceHistoryProvider>,
    publisher: Arc<dyn ReportPublisher>,
    config: ForecastConfig,
    forecaster: MonteCarloForecaster,
}

impl ForecastPipeline {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        publisher: Arc<dyn ReportPublisher>,
        config: ForecastConfig,
    ) -> PipelineResult<Self> {
        let forecaster = MonteCarloForecaster::new(config.monte_carlo())?;
        Ok(Self {
            provider,
            publisher,
            config,
            forecaster,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// 以 `run_date` 為執行日處理所有商品並發布
    pub async fn run(&self, run_date: NaiveDate) -> RunSummary {
        let window = LookbackWindow::ending_at(run_date, self.config.lookback_days);
        let target = target_date(run_date);

        info!(
            instruments = self.config.instruments.len(),
            sample_size = self.config.sample_size,
            %window,
            %target,
            "開始預測流程"
        );

        let mut batch = ForecastBatch::new();
        let mut failures = Vec::new();

        for (index, instrument_id) in self.config.instruments.iter().enumerate() {
            let mut rng = instrument_rng(self.config.seed, index as u64);
            match self
                .forecast_instrument(instrument_id, &window, target, &mut rng)
                .await
            {
                Ok(record) => {
                    info!(
                        instrument = instrument_id.as_str(),
                        last_price = record.last_price(),
                        expected_price = record.expected_price(),
                        trend = %record.trend(),
                        "商品預測完成"
                    );
                    ForecastMetrics::record_instrument(InstrumentOutcome::Forecasted);
                    batch.push(record);
                }
                Err(e) => {
                    warn!(
                        instrument = instrument_id.as_str(),
                        stage = e.stage(),
                        error = %e,
                        "商品處理失敗，已略過"
                    );
                    ForecastMetrics::record_instrument(InstrumentOutcome::Skipped {
                        stage: e.stage(),
                    });
                    failures.push(InstrumentFailure {
                        instrument_id: instrument_id.clone(),
                        stage: e.stage(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let publication = self.publish(&batch).await;

        RunSummary {
            batch,
            failures,
            publication,
        }
    }

    async fn forecast_instrument<R: Rng + Send>(
        &self,
        instrument_id: &str,
        window: &LookbackWindow,
        target: NaiveDate,
        rng: &mut R,
    ) -> Result<ForecastRecord, PipelineError> {
        let series = self.provider.fetch(instrument_id, window).await?;
        debug!(
            instrument = instrument_id,
            observations = series.len(),
            "價格序列已取得"
        );

        let stats = forecast::extract(&series)?;
        let last_price = series.last_price().ok_or_else(|| {
            PipelineError::Forecast(ForecastError::InsufficientData {
                required: 1,
                actual: 0,
            })
        })?;

        let started = Instant::now();
        let result = self.forecaster.simulate(last_price, &stats, rng)?;
        ForecastMetrics::record_simulation(result.sample_size, started.elapsed());

        Ok(forecast::assemble(
            instrument_id,
            last_price,
            &stats,
            &result,
            target,
        ))
    }

    async fn publish(&self, batch: &ForecastBatch) -> Publication {
        if batch.is_empty() {
            warn!("沒有任何商品完成預測，略過發布");
            ForecastMetrics::record_publish(PublishOutcome::Skipped, 0);
            return Publication::Skipped;
        }

        match self.publisher.publish(batch).await {
            Ok(()) => {
                info!(records = batch.len(), "預測報告發布成功");
                ForecastMetrics::record_publish(PublishOutcome::Published, batch.len());
                Publication::Published
            }
            Err(e) => {
                error!(error = %e, records = batch.len(), "預測報告發布失敗");
                ForecastMetrics::record_publish(PublishOutcome::Failed, batch.len());
                Publication::Failed(e.to_string())
            }
        }
    }
}
