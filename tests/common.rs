#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use quant_engine::domain_types::{PricePoint, PriceSeries, ReturnStats};

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// 以 `end` 為最後一日、每日一筆的收盤價序列
pub fn daily_series(instrument_id: &str, end: NaiveDate, closes: &[f64]) -> PriceSeries {
    let n = closes.len() as u64;
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: end - Days::new(n - 1 - i as u64),
            close,
        })
        .collect();
    PriceSeries::new(instrument_id, points).unwrap()
}

/// 緩慢上漲並帶有固定振盪的序列
pub fn trending_closes(len: usize, start: f64) -> Vec<f64> {
    (0..len)
        .map(|i| start * (1.0 + 0.0005 * i as f64) * (1.0 + 0.01 * ((i % 5) as f64 - 2.0)))
        .collect()
}

pub fn stats(mean: f64, std_dev: f64) -> ReturnStats {
    ReturnStats::new(mean, std_dev)
}

/// Yahoo chart API 回應樣本（2024-03-13 ~ 2024-03-15，NY 交易所時區）
pub const YAHOO_CHART_FIXTURE: &str = r#"{
  "chart": {
    "result": [{
      "meta": {"currency": "USD", "symbol": "ES=F", "gmtoffset": -14400, "timezone": "EDT"},
      "timestamp": [1710302400, 1710388800, 1710475200, 1710475260],
      "indicators": {
        "quote": [{
          "open":   [5180.0, 5170.25, 5160.0, null],
          "high":   [5200.0, 5190.0, 5175.5, null],
          "low":    [5160.0, 5150.0, 5120.0, null],
          "close":  [5175.25, null, 5150.5, 5151.0],
          "volume": [1500000, 1400000, 1700000, 10]
        }],
        "adjclose": [{"adjclose": [5175.25, null, 5150.5, 5151.0]}]
      }
    }],
    "error": null
  }
}"#;

pub const YAHOO_NOT_FOUND_FIXTURE: &str = r#"{
  "chart": {
    "result": null,
    "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
  }
}"#;

/// 依序回應固定 HTTP 回應的本機伺服器，回傳位址與收到的請求內容
///
/// 每個連線處理一個請求後關閉，回應數量即預期的連線數。
pub async fn serve_responses(
    responses: Vec<(u16, &'static str)>,
) -> (std::net::SocketAddr, tokio::task::JoinHandle<Vec<String>>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                if request_complete(&raw) {
                    break;
                }
            }
            requests.push(String::from_utf8_lossy(&raw).into_owned());

            let response = format!(
                "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
        requests
    });

    (addr, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&raw[..header_end]);
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}
