//! 線性插值百分位
//!
//! 排序後的樣本 `x[0..n]`，百分位 `q` (0-100) 的分數位置為
//! `h = (n - 1) * q / 100`。取 `lo = floor(h)`、`hi = min(lo + 1, n - 1)`，
//! 結果為 `x[lo] + (h - lo) * (x[hi] - x[lo])`，並限制在 `[x[lo], x[hi]]`
//! 之內。此規則即 Hyndman-Fan 第 7 型，與 numpy 預設的 `linear` 相同。
//!
//! 由於結果落在相鄰順序統計量之間，較高的等級永遠不會得到較小的值。

use crate::domain_types::{Percentile, PercentileBands};

/// 升冪排序樣本
pub fn sort_samples(samples: &mut [f64]) {
    samples.sort_unstable_by(f64::total_cmp);
}

/// 已排序樣本的線性插值百分位，空樣本回傳 `None`
pub fn percentile_of_sorted(sorted: &[f64], rank: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let rank = rank.clamp(0.0, 100.0);
    let h = (n - 1) as f64 * rank / 100.0;
    let lo = (h.floor() as usize).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;

    let lower = sorted[lo];
    let upper = sorted[hi];
    let value = lower + frac * (upper - lower);

    Some(value.clamp(lower, upper))
}

/// 計算報告所需的五個百分位
pub fn percentile_bands(sorted: &[f64]) -> Option<PercentileBands> {
    let at = |p: Percentile| percentile_of_sorted(sorted, p.rank());

    Some(PercentileBands {
        p1: at(Percentile::P1)?,
        p5: at(Percentile::P5)?,
        p50: at(Percentile::P50)?,
        p95: at(Percentile::P95)?,
        p99: at(Percentile::P99)?,
    })
}
