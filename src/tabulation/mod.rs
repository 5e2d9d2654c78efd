//! 计分引擎
//!
//! 纯计算模块，不依赖存储与网络：
//! - `aggregation`: 评分细则 → 环节 → 比赛总分的加权汇总
//! - `ranking`: 按比赛分组并排序，生成排行榜

pub mod aggregation;
pub mod ranking;

pub use aggregation::{
    AdminScoreRecord, AggregationInput, CandidateTotal, JudgeScoreRecord, aggregate,
};
pub use ranking::{Leaderboards, RankedCandidate, build_leaderboards};

/// 四舍五入（远离零）到指定小数位
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(91.5, 2), 91.5);
        assert_eq!(round_to(86.899999999, 2), 86.9);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.23456, 4), 1.2346);
    }
}
