//! 排行榜
//!
//! 按比赛名称分组，组内按总分降序排列。同分时依次按选手编号、选手 ID 升序；
//! 尚无得分的选手排在最后。使用 BTreeMap 保证相同数据序列化结果完全一致。

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use super::aggregation::CandidateTotal;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/results.ts")]
pub struct RankedCandidate {
    /// 组内名次，从 1 开始
    pub rank: usize,
    pub candidate_id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    pub contest_id: i64,
    pub segment_scores: BTreeMap<i64, f64>,
    pub total_score: Option<f64>,
}

/// 比赛名称 → 排好序的选手列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/results.ts")]
pub struct Leaderboards(pub BTreeMap<String, Vec<RankedCandidate>>);

impl Leaderboards {
    pub fn contest(&self, name: &str) -> Option<&[RankedCandidate]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

fn compare_totals(a: &CandidateTotal, b: &CandidateTotal) -> Ordering {
    let by_score = match (a.total_score, b.total_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score
        .then_with(|| a.candidate_number.cmp(&b.candidate_number))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

/// 由汇总结果生成分组排行榜
pub fn build_leaderboards(totals: Vec<CandidateTotal>) -> Leaderboards {
    let mut groups: BTreeMap<String, Vec<CandidateTotal>> = BTreeMap::new();
    for total in totals {
        groups
            .entry(total.contest_name.clone())
            .or_default()
            .push(total);
    }

    let boards = groups
        .into_iter()
        .map(|(contest_name, mut rows)| {
            rows.sort_by(compare_totals);
            let ranked = rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| RankedCandidate {
                    rank: index + 1,
                    candidate_id: row.candidate_id,
                    name: row.name,
                    candidate_number: row.candidate_number,
                    image_url: row.image_url,
                    contest_id: row.contest_id,
                    segment_scores: row.segment_scores,
                    total_score: row.total_score,
                })
                .collect();
            (contest_name, ranked)
        })
        .collect();

    Leaderboards(boards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::segments::entities::SegmentType;
    use crate::tabulation::aggregation::tests::{
        candidate, contest, judge_score, segment,
    };
    use crate::tabulation::aggregation::{AggregationInput, aggregate};

    fn total(id: i64, contest: &str, number: i32, score: Option<f64>) -> CandidateTotal {
        CandidateTotal {
            candidate_id: id,
            name: format!("C{id}"),
            candidate_number: number,
            image_url: None,
            contest_id: 1,
            contest_name: contest.to_string(),
            segment_scores: BTreeMap::new(),
            total_score: score,
        }
    }

    #[test]
    fn test_sorted_descending_with_unscored_last() {
        let boards = build_leaderboards(vec![
            total(1, "A", 1, Some(70.0)),
            total(2, "A", 2, None),
            total(3, "A", 3, Some(90.0)),
        ]);
        let ids: Vec<i64> = boards
            .contest("A")
            .unwrap()
            .iter()
            .map(|r| r.candidate_id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(boards.contest("A").unwrap()[0].rank, 1);
    }

    #[test]
    fn test_ties_break_by_candidate_number() {
        let boards = build_leaderboards(vec![
            total(1, "A", 5, Some(80.0)),
            total(2, "A", 2, Some(80.0)),
            total(3, "A", 2, Some(80.0)),
        ]);
        let ids: Vec<i64> = boards
            .contest("A")
            .unwrap()
            .iter()
            .map(|r| r.candidate_id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_grouped_by_contest_name() {
        let boards = build_leaderboards(vec![
            total(1, "Beta", 1, Some(1.0)),
            total(2, "Alpha", 1, Some(2.0)),
        ]);
        let names: Vec<&String> = boards.0.keys().collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_recompute_is_byte_identical() {
        let input = AggregationInput {
            contests: vec![contest(1, "One"), contest(2, "Two")],
            candidates: vec![candidate(1, 1, 1), candidate(2, 1, 2), candidate(3, 2, 1)],
            segments: vec![
                segment(1, 1, 100.0, SegmentType::Judge),
                segment(2, 2, 100.0, SegmentType::Judge),
            ],
            judge_scores: vec![
                judge_score(1, 1, 1, 50.0),
                judge_score(1, 2, 1, 50.0),
                judge_score(2, 3, 2, 75.25),
            ],
            admin_scores: vec![],
        };
        let first = serde_json::to_string(&build_leaderboards(aggregate(&input, 2))).unwrap();
        let second = serde_json::to_string(&build_leaderboards(aggregate(&input, 2))).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(r#"{"One":[{"rank":1,"candidate_id":1"#));
    }
}
