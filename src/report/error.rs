//! 報告發布錯誤定義

use thiserror::Error;

/// 報告發布錯誤類型
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("未設定發布目的地: {0}")]
    MissingDestination(String),

    #[error("傳送失敗: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("目的地拒絕報告: HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// 報告發布結果類型
pub type PublishResult<T> = Result<T, PublishError>;
