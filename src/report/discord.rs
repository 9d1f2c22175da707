//! Discord Webhook 報告發布
//!
//! 每個商品一個 embed，綠色代表預期價格不低於最新收盤，紅色代表看跌。
//! Discord 每則訊息最多 10 個 embed，超過時分批傳送。

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::error::{PublishError, PublishResult};
use super::panel::ForecastPanel;
use super::ReportPublisher;
use crate::config::PublisherConfig;
use crate::domain_types::{ForecastBatch, Trend};

/// Discord 單則訊息的 embed 上限
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;
pub const BULLISH_COLOR: u32 = 5_763_719;
pub const BEARISH_COLOR: u32 = 15_548_997;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

pub fn trend_color(trend: Trend) -> u32 {
    match trend {
        Trend::Bullish => BULLISH_COLOR,
        Trend::Bearish => BEARISH_COLOR,
    }
}

/// 建立單一商品的 embed
pub fn build_embed(panel: &ForecastPanel, footer: &str) -> Embed {
    Embed {
        title: format!("📊 Proyección: {}", panel.instrument_id),
        description: format!(
            "Percentiles institucionales para el **{}**.",
            panel.target_date
        ),
        color: trend_color(panel.trend),
        fields: vec![
            EmbedField::inline("Precio Cierre Hoy", format!("**{}**", panel.last_price)),
            EmbedField::inline("Precio Esperado (Mean)", panel.expected_price.clone()),
            EmbedField::inline("Volatilidad Anual", panel.annualized_volatility.clone()),
            EmbedField::inline(
                "📉 Soporte (P1 - P5)",
                format!("P1: {}\nP5: {}", panel.p1, panel.p5),
            ),
            EmbedField::inline("🎯 Rango Medio (P50)", format!("**{}**", panel.p50)),
            EmbedField::inline(
                "📈 Resistencia (P95 - P99)",
                format!("P95: {}\nP99: {}", panel.p95, panel.p99),
            ),
        ],
        footer: EmbedFooter {
            text: footer.to_string(),
        },
    }
}

/// Discord Webhook 發布者
pub struct DiscordPublisher {
    client: Client,
    webhook_url: String,
    username: String,
    avatar_url: String,
    footer: String,
}

// Webhook URL 內含權杖，不輸出到日誌
impl fmt::Debug for DiscordPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordPublisher")
            .field("webhook_url", &"<redacted>")
            .field("username", &self.username)
            .field("avatar_url", &self.avatar_url)
            .field("footer", &self.footer)
            .finish()
    }
}

impl DiscordPublisher {
    /// 依配置建立發布者，未設定 Webhook 時回傳 `MissingDestination`
    pub fn new(config: &PublisherConfig) -> PublishResult<Self> {
        let webhook_url = config.webhook_url().ok_or_else(|| {
            PublishError::MissingDestination("publisher.webhook_url".to_string())
        })?;

        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
            username: config.username.clone(),
            avatar_url: config.avatar_url.clone(),
            footer: config.footer.clone(),
        })
    }

    /// 將批次轉為 Webhook 訊息，每則最多 [`MAX_EMBEDS_PER_MESSAGE`] 個 embed
    pub fn build_payloads(&self, batch: &ForecastBatch) -> Vec<WebhookPayload> {
        let embeds: Vec<Embed> = batch
            .iter()
            .map(|record| build_embed(&ForecastPanel::from(record), &self.footer))
            .collect();

        embeds
            .chunks(MAX_EMBEDS_PER_MESSAGE)
            .map(|chunk| WebhookPayload {
                username: self.username.clone(),
                avatar_url: self.avatar_url.clone(),
                embeds: chunk.to_vec(),
            })
            .collect()
    }

    async fn post(&self, payload: &WebhookPayload) -> PublishResult<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), embeds = payload.embeds.len(), "Webhook 訊息已送出");
        Ok(())
    }
}

#[async_trait]
impl ReportPublisher for DiscordPublisher {
    async fn publish(&self, batch: &ForecastBatch) -> PublishResult<()> {
        let payloads = self.build_payloads(batch);
        for payload in &payloads {
            self.post(payload).await?;
        }

        info!(
            records = batch.len(),
            messages = payloads.len(),
            "預測報告已發布到 Discord"
        );
        Ok(())
    }
}
