use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use crate::forecast::{MonteCarloConfig, DEFAULT_HORIZON_DAYS, DEFAULT_SAMPLE_SIZE};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub forecast: ForecastConfig,
    pub provider: ProviderConfig,
    pub publisher: PublisherConfig,
    pub log: LogConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.forecast.validate()?;
        self.provider.validate()?;
        self.publisher.validate()?;
        self.log.validate()?;

        Ok(())
    }
}

/// 預測配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 依序處理的商品代碼
    pub instruments: Vec<String>,
    /// 蒙地卡羅模擬次數
    pub sample_size: usize,
    /// 預測步數，固定為 1
    pub horizon_days: u32,
    /// 歷史價格回溯日曆日數
    pub lookback_days: u32,
    /// 亂數種子，未設定時使用作業系統熵源
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            instruments: vec!["NQ=F".to_string(), "ES=F".to_string()],
            sample_size: DEFAULT_SAMPLE_SIZE,
            horizon_days: DEFAULT_HORIZON_DAYS,
            lookback_days: 365,
            seed: None,
        }
    }
}

impl ForecastConfig {
    pub fn monte_carlo(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            sample_size: self.sample_size,
            horizon_days: self.horizon_days,
        }
    }
}

impl Validator for ForecastConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.instruments.is_empty() {
            return Err(ValidationError::MissingField("forecast.instruments".to_string()));
        }
        for instrument in &self.instruments {
            ValidationUtils::not_empty(instrument, "forecast.instruments")?;
        }

        ValidationUtils::in_range(self.sample_size, 1, 10_000_000, "forecast.sample_size")?;
        ValidationUtils::in_range(
            self.horizon_days,
            DEFAULT_HORIZON_DAYS,
            DEFAULT_HORIZON_DAYS,
            "forecast.horizon_days",
        )?;
        ValidationUtils::in_range(self.lookback_days, 2, 3650, "forecast.lookback_days")?;

        Ok(())
    }
}

/// 價格數據源種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

/// 價格數據源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub csv_directory: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_directory: "data".to_string(),
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; quant-engine/0.1)".to_string(),
        }
    }
}

impl ProviderConfig {
    /// 獲取請求超時持續時間
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validator for ProviderConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.kind {
            ProviderKind::Yahoo => {
                ValidationUtils::http_url(&self.base_url, "provider.base_url")?;
                ValidationUtils::in_range(
                    self.request_timeout_secs,
                    1,
                    300,
                    "provider.request_timeout_secs",
                )?;
            }
            ProviderKind::Csv => {
                ValidationUtils::not_empty(&self.csv_directory, "provider.csv_directory")?;
            }
        }

        Ok(())
    }
}

/// 報告發布方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherKind {
    Discord,
    Console,
}

/// 報告發布配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub kind: PublisherKind,
    /// Discord Webhook URL（敏感資訊，只從環境變數提供）
    #[serde(default)]
    pub webhook_url: Option<String>,
    pub username: String,
    pub avatar_url: String,
    pub footer: String,
    pub request_timeout_secs: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            kind: PublisherKind::Discord,
            webhook_url: None,
            username: "Quant Engine Bot".to_string(),
            avatar_url: "https://i.imgur.com/4M34hi2.png".to_string(),
            footer: "Quant Engine | Monte Carlo Simulation | Confianza: 95%".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl PublisherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 去除空白後的 Webhook URL
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl Validator for PublisherConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.kind == PublisherKind::Discord {
            ValidationUtils::check_dependency(
                true,
                self.webhook_url().is_some(),
                "publisher.kind = discord",
                "publisher.webhook_url",
            )?;
            if let Some(url) = self.webhook_url() {
                ValidationUtils::http_url(url, "publisher.webhook_url")?;
            }
            ValidationUtils::in_range(
                self.request_timeout_secs,
                1,
                300,
                "publisher.request_timeout_secs",
            )?;
        }
        ValidationUtils::not_empty(&self.username, "publisher.username")?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 日誌檔目錄，未設定時只輸出到終端
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>(),
            "log.format",
        )?;

        Ok(())
    }
}
