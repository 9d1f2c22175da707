use config::ConfigError;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::{ValidationError, Validator};

/// 舊版部署使用的 Webhook 環境變數
pub const LEGACY_WEBHOOK_VAR: &str = "DISCORD_WEBHOOK_URL";

/// 配置初始化錯誤
#[derive(Error, Debug)]
pub enum ConfigInitError {
    #[error("配置載入失敗: {0}")]
    Load(#[from] ConfigError),

    #[error("配置驗證失敗: {0}")]
    Validation(#[from] ValidationError),
}

/// 初始化配置（在應用程序啟動時調用）
///
/// 載入 `config_dir` 下的環境配置，套用 `overrides`（命令列參數）後驗證。
pub fn init_config<F>(
    env: Environment,
    config_dir: &Path,
    overrides: F,
) -> Result<ApplicationConfig, ConfigInitError>
where
    F: FnOnce(&mut ApplicationConfig),
{
    let mut app_config = ApplicationConfig::load_from_dir(env, config_dir)?;
    overrides(&mut app_config);
    app_config.validate()?;
    debug!(%env, config_dir = %config_dir.display(), "配置初始化成功");
    Ok(app_config)
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從指定目錄與環境加載配置（尚未驗證）
    pub fn load_from_dir(env: Environment, config_dir: &Path) -> Result<Self, ConfigError> {
        let config_source = ConfigLoader::load_from_dir(env, config_dir)?;

        // 使用 serde 反序列化配置
        let mut app_config: ApplicationConfig = config_source.try_deserialize()?;
        app_config.apply_legacy_webhook();

        Ok(app_config)
    }

    /// 未設定 Webhook 時採用 `DISCORD_WEBHOOK_URL`
    fn apply_legacy_webhook(&mut self) {
        if self.publisher.webhook_url().is_some() {
            return;
        }
        if let Ok(url) = env::var(LEGACY_WEBHOOK_VAR) {
            debug!("使用 {} 作為 Webhook 目的地", LEGACY_WEBHOOK_VAR);
            self.publisher.webhook_url = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ProviderKind, PublisherKind};
    use serial_test::serial;
    use std::fs;

    const DEV_TOML: &str = r#"
[forecast]
instruments = ["AAPL", "MSFT", "^GSPC"]
sample_size = 5000
seed = 7

[provider]
kind = "csv"
csv_directory = "fixtures"

[publisher]
kind = "console"

[log]
level = "debug"
format = "json"
"#;

    fn clear_env() {
        env::remove_var(LEGACY_WEBHOOK_VAR);
        env::remove_var("QUANT__FORECAST__INSTRUMENTS");
        env::remove_var("QUANT__FORECAST__SAMPLE_SIZE");
        env::remove_var("QUANT__PUBLISHER__WEBHOOK_URL");
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("development.toml"), DEV_TOML).unwrap();

        let config = ApplicationConfig::load_from_dir(Environment::Development, dir.path()).unwrap();

        assert_eq!(config.forecast.instruments, vec!["AAPL", "MSFT", "^GSPC"]);
        assert_eq!(config.forecast.sample_size, 5000);
        assert_eq!(config.forecast.seed, Some(7));
        assert_eq!(config.forecast.lookback_days, 365);
        assert_eq!(config.provider.kind, ProviderKind::Csv);
        assert_eq!(config.publisher.kind, PublisherKind::Console);
        assert_eq!(config.log.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("development.toml"), DEV_TOML).unwrap();
        env::set_var("QUANT__FORECAST__INSTRUMENTS", "NQ=F,ES=F");
        env::set_var("QUANT__FORECAST__SAMPLE_SIZE", "250");

        let config = ApplicationConfig::load_from_dir(Environment::Development, dir.path()).unwrap();
        clear_env();

        assert_eq!(config.forecast.instruments, vec!["NQ=F", "ES=F"]);
        assert_eq!(config.forecast.sample_size, 250);
    }

    #[test]
    #[serial]
    fn test_legacy_webhook_variable() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        env::set_var(LEGACY_WEBHOOK_VAR, "https://discord.com/api/webhooks/1/legacy");

        let config = ApplicationConfig::load_from_dir(Environment::Production, dir.path()).unwrap();

        assert_eq!(config.publisher.kind, PublisherKind::Discord);
        assert_eq!(
            config.publisher.webhook_url(),
            Some("https://discord.com/api/webhooks/1/legacy")
        );
        assert!(config.validate().is_ok());

        env::set_var("QUANT__PUBLISHER__WEBHOOK_URL", "https://discord.com/api/webhooks/2/new");
        let config = ApplicationConfig::load_from_dir(Environment::Production, dir.path()).unwrap();
        clear_env();

        assert_eq!(
            config.publisher.webhook_url(),
            Some("https://discord.com/api/webhooks/2/new")
        );
    }

    #[test]
    #[serial]
    fn test_init_config_applies_overrides_before_validation() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();

        // production 預設使用 Discord，沒有 Webhook 時驗證失敗
        let err = init_config(Environment::Production, dir.path(), |_| {}).unwrap_err();
        assert!(matches!(err, ConfigInitError::Validation(_)));

        let config = init_config(Environment::Production, dir.path(), |config| {
            config.publisher.kind = PublisherKind::Console;
            config.forecast.seed = Some(3);
        })
        .unwrap();
        assert_eq!(config.publisher.kind, PublisherKind::Console);
        assert_eq!(config.forecast.seed, Some(3));
    }

    #[test]
    #[serial]
    fn test_init_config_reports_malformed_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("development.toml"), "[forecast\nsample_size = ").unwrap();

        let err = init_config(Environment::Development, dir.path(), |_| {}).unwrap_err();
        assert!(matches!(err, ConfigInitError::Load(_)));
    }

    #[rstest::rstest]
    #[case(Environment::Development)]
    #[case(Environment::Production)]
    #[serial]
    fn test_shipped_configs_leave_seed_unset(#[case] environment: Environment) {
        clear_env();
        env::remove_var("QUANT__FORECAST__SEED");
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");

        let config = ApplicationConfig::load_from_dir(environment, &dir).unwrap();
        assert_eq!(config.forecast.seed, None);
    }

    #[test]
    #[serial]
    fn test_discord_without_webhook_fails_validation() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let config = ApplicationConfig::load_from_dir(Environment::Production, dir.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::DependencyError { .. })
        ));
    }
}
