// time_utils.rs
//
// 提供日期轉換相關的工具函數，用於在數據源、預測引擎與報告之間轉換日期格式。
// 主要功能：
// 1. 計算預測目標日與回溯區間
// 2. 在 Unix 時間戳與交易日之間轉換

use chrono::{DateTime, Days, Local, NaiveDate, Utc};

//
// 預測日期
//

/// 當地時間的今天
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// 預測目標日：執行日加一個日曆日（不跳過週末與假日）
pub fn target_date(run_date: NaiveDate) -> NaiveDate {
    run_date.succ_opt().unwrap_or(NaiveDate::MAX)
}

/// 回溯區間起始日：結束日往前 `lookback_days` 個日曆日
pub fn lookback_start(end: NaiveDate, lookback_days: u32) -> NaiveDate {
    end.checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN)
}

//
// Unix 時間戳 <-> 交易日
//

/// 將日期的 00:00:00 UTC 轉換為 Unix 秒
pub fn date_to_unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// 將 Unix 秒加上交易所時區偏移後轉換為交易日
pub fn unix_seconds_to_trading_day(ts: i64, gmt_offset_secs: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts.checked_add(gmt_offset_secs)?, 0).map(|dt| dt.date_naive())
}
