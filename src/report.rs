//! 報告發布模組
//!
//! 將一批預測記錄渲染為面板並送到目的地。發布失敗只回報錯誤，
//! 不重試也不中斷執行。

pub mod console;
pub mod discord;
pub mod error;
pub mod panel;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{PublisherConfig, PublisherKind};
use crate::domain_types::ForecastBatch;

pub use console::ConsolePublisher;
pub use discord::{build_embed, DiscordPublisher, Embed, EmbedField, WebhookPayload};
pub use error::{PublishError, PublishResult};
pub use panel::{format_price, ForecastPanel};

/// 報告發布者特性
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    /// 發布整批預測，呼叫端保證批次非空
    async fn publish(&self, batch: &ForecastBatch) -> PublishResult<()>;
}

/// 依配置建立發布者
pub fn build_publisher(config: &PublisherConfig) -> PublishResult<Arc<dyn ReportPublisher>> {
    let publisher: Arc<dyn ReportPublisher> = match config.kind {
        PublisherKind::Discord => Arc::new(DiscordPublisher::new(config)?),
        PublisherKind::Console => Arc::new(ConsolePublisher::new()),
    };
    Ok(publisher)
}
