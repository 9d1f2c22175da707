//! 預測流程
//!
//! 依序處理每個商品：獲取價格、計算報酬統計、模擬、組裝記錄。
//! 單一商品失敗只記錄並略過，批次非空時才交給發布者。

pub mod error;
pub mod runner;

pub use error::{PipelineError, PipelineResult};
pub use runner::{ForecastPipeline, InstrumentFailure, Publication, RunSummary};
