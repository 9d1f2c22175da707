use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use quant_engine::config::{
    init_config, ApplicationConfig, ConfigLoader, Environment, LogConfig, PublisherKind,
};
use quant_engine::data_provider::build_provider;
use quant_engine::pipeline::{ForecastPipeline, Publication};
use quant_engine::report::build_publisher;
use quant_engine::utils::today_local;

/// 蒙地卡羅次日價格預測
#[derive(Debug, Parser)]
#[command(name = "quant_engine", version, about)]
struct Cli {
    /// 配置目錄（預設讀取 CONFIG_DIR 或 ./config）
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// 執行環境：development 或 production（預設讀取 QUANT_ENV）
    #[arg(long)]
    env: Option<Environment>,

    /// 覆寫商品清單，可重複指定
    #[arg(short, long = "instrument")]
    instruments: Vec<String>,

    /// 覆寫模擬次數
    #[arg(long)]
    sample_size: Option<usize>,

    /// 固定亂數種子
    #[arg(long)]
    seed: Option<u64>,

    /// 只輸出到終端，不發送 Webhook
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ApplicationConfig) {
        if !self.instruments.is_empty() {
            config.forecast.instruments = self.instruments.clone();
        }
        if let Some(sample_size) = self.sample_size {
            config.forecast.sample_size = sample_size;
        }
        if self.seed.is_some() {
            config.forecast.seed = self.seed;
        }
        if self.dry_run {
            config.publisher.kind = PublisherKind::Console;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let env = cli.env.unwrap_or_else(Environment::from_env);
    let config_dir = cli.config_dir.clone().unwrap_or_else(ConfigLoader::config_dir);
    let app_config = init_config(env, &config_dir, |config| cli.apply_overrides(config))
        .with_context(|| format!("無法初始化配置: {}", config_dir.display()))?;

    // 初始化日誌系統，guard 必須存活到程式結束
    let _log_guard = init_logging(&app_config.log)?;
    info!(%env, config_dir = %config_dir.display(), "配置載入完成");

    let provider = build_provider(&app_config.provider).context("無法建立價格數據源")?;
    let publisher = build_publisher(&app_config.publisher).context("無法建立報告發布者")?;
    let pipeline = ForecastPipeline::new(provider, publisher, app_config.forecast.clone())
        .context("無法建立預測流程")?;

    let summary = pipeline.run(today_local()).await;

    match &summary.publication {
        Publication::Published => info!(
            forecasted = summary.forecasted(),
            skipped = summary.skipped(),
            "執行完成"
        ),
        Publication::Skipped => warn!(skipped = summary.skipped(), "執行完成，但沒有可發布的預測"),
        Publication::Failed(reason) => warn!(
            forecasted = summary.forecasted(),
            reason = reason.as_str(),
            "執行完成，但報告發布失敗"
        ),
    }

    Ok(())
}

/// 初始化日誌系統
///
/// `RUST_LOG` 優先於 `log.level`。設定 `log.directory` 時改寫入每日輪替的檔案。
fn init_logging(log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_config.level.to_lowercase()))
        .map_err(|e| anyhow!("無效的日誌級別: {}", e))?;

    let (writer, guard, ansi) = match &log_config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "quant_engine.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    let result = if log_config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    Ok(guard)
}
