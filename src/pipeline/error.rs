use thiserror::Error;

use crate::data_provider::DataProviderError;
use crate::forecast::ForecastError;

/// 單一商品處理錯誤，在流程邊界被記錄後略過該商品
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("價格數據獲取失敗: {0}")]
    DataProvider(#[from] DataProviderError),

    #[error("預測計算失敗: {0}")]
    Forecast(#[from] ForecastError),
}

impl PipelineError {
    /// 失敗階段，用於日誌與監控標籤
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::DataProvider(_) => "fetch",
            PipelineError::Forecast(_) => "forecast",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
