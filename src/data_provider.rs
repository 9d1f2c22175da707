pub mod csv_loader;
pub mod error;
pub mod loader;
pub mod yahoo;

use std::sync::Arc;

use crate::config::{ProviderConfig, ProviderKind};

pub use csv_loader::{parse_csv_bars, CsvPriceProvider};
pub use error::{DataProviderError, DataProviderResult};
pub use loader::{LookbackWindow, PriceHistoryProvider};
pub use yahoo::{parse_chart_response, YahooChartProvider};

/// 依配置建立價格數據源
pub fn build_provider(config: &ProviderConfig) -> DataProviderResult<Arc<dyn PriceHistoryProvider>> {
    let provider: Arc<dyn PriceHistoryProvider> = match config.kind {
        ProviderKind::Yahoo => Arc::new(YahooChartProvider::new(config)?),
        ProviderKind::Csv => Arc::new(CsvPriceProvider::new(&config.csv_directory)),
    };
    Ok(provider)
}
