//! 預測引擎錯誤定義

use thiserror::Error;

/// 預測引擎錯誤類型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("數據不足: 至少需要 {required} 筆價格，實際只有 {actual} 筆")]
    InsufficientData { required: usize, actual: usize },

    #[error("無效的價格: {context}, 值 {value}")]
    InvalidPrice { context: String, value: f64 },

    #[error("無效的參數: {0}")]
    InvalidParameter(String),

    #[error("抽樣失敗: {0}")]
    Sampling(String),
}

/// 預測引擎結果類型
pub type ForecastResult<T> = Result<T, ForecastError>;
