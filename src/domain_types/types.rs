//! 基本市場數據類型定義

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 從日線記錄中選取的價格欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Close,         // 收盤價
    AdjustedClose, // 還原權息後的收盤價
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Close => write!(f, "Close"),
            PriceField::AdjustedClose => write!(f, "AdjustedClose"),
        }
    }
}

/// 領域錯誤類型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("無效的數據格式: {0}")]
    InvalidDataFormat(String),

    #[error("缺少必要欄位: {0}")]
    MissingRequiredField(String),

    #[error("時間序列順序錯誤: {0}")]
    TimeSeriesError(String),
}

/// 領域結果類型
pub type Result<T> = std::result::Result<T, DomainError>;

/// 標準列名定義
pub struct ColumnName;

impl ColumnName {
    pub const DATE: &'static str = "date"; // 交易日 (YYYY-MM-DD)
    pub const CLOSE: &'static str = "close"; // 收盤價

    /// 日線檔案必須包含的欄位
    pub const REQUIRED: [&'static str; 2] = [Self::DATE, Self::CLOSE];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_field_display() {
        assert_eq!(PriceField::Close.to_string(), "Close");
        assert_eq!(PriceField::AdjustedClose.to_string(), "AdjustedClose");
    }

    #[test]
    fn test_required_columns_are_date_and_close() {
        assert_eq!(ColumnName::REQUIRED, ["date", "close"]);
    }

    #[test]
    fn test_domain_error_message() {
        let err = DomainError::MissingRequiredField("close".to_string());
        assert_eq!(err.to_string(), "缺少必要欄位: close");
    }
}
