//! 價格數據源錯誤定義

use thiserror::Error;

use crate::domain_types::DomainError;

/// 價格數據源錯誤類型
#[derive(Error, Debug)]
pub enum DataProviderError {
    #[error("沒有可用數據: {0}")]
    DataUnavailable(String),

    #[error("未知的商品代碼: {0}")]
    UnknownInstrument(String),

    #[error("HTTP 請求錯誤: {0}")]
    Http(#[from] reqwest::Error),

    #[error("回應格式錯誤: {0}")]
    InvalidResponse(String),

    #[error("檔案讀取錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析錯誤: {0}")]
    Csv(#[from] csv::Error),

    #[error("數據格式錯誤: {0}")]
    Domain(#[from] DomainError),
}

/// 價格數據源結果類型
pub type DataProviderResult<T> = Result<T, DataProviderError>;
