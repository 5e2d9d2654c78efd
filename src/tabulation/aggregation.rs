//! 分数汇总
//!
//! 计算分四步：
//! 1. 评委环节：按 (评委, 选手, 环节) 累加该评委各细则得分
//! 2. 对给该选手打过分的评委取平均，未打分的评委不计入
//! 3. 管理员环节：直接取管理员录入的分数
//! 4. 比赛总分 = Σ 环节得分 × 环节权重 / 100，没有得分的环节不参与求和
//!
//! 中间结果保持完整精度，只对输出的环节得分与总分做舍入。

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use ts_rs::TS;

use crate::models::candidates::entities::Candidate;
use crate::models::contests::entities::Contest;
use crate::models::segments::entities::{Segment, SegmentType};

use super::round_to;

/// 一条评委细则得分，segment_id 为服务端写入时推导的所属环节
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeScoreRecord {
    pub judge_id: i64,
    pub candidate_id: i64,
    pub segment_id: i64,
    pub score: f64,
}

/// 一条管理员环节得分
#[derive(Debug, Clone, PartialEq)]
pub struct AdminScoreRecord {
    pub candidate_id: i64,
    pub segment_id: i64,
    pub score: f64,
}

/// 汇总所需的全部已提交数据
#[derive(Debug, Clone, Default)]
pub struct AggregationInput {
    pub contests: Vec<Contest>,
    pub candidates: Vec<Candidate>,
    pub segments: Vec<Segment>,
    pub judge_scores: Vec<JudgeScoreRecord>,
    pub admin_scores: Vec<AdminScoreRecord>,
}

/// 每位选手的最终结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/results.ts")]
pub struct CandidateTotal {
    pub candidate_id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    pub contest_id: i64,
    pub contest_name: String,
    /// 环节 ID → 环节得分（已舍入）
    pub segment_scores: BTreeMap<i64, f64>,
    /// 尚无任何得分时为 None
    pub total_score: Option<f64>,
}

/// 计算 (选手, 环节) → 环节得分，不做舍入
pub fn segment_scores(input: &AggregationInput) -> BTreeMap<(i64, i64), f64> {
    let segments: HashMap<i64, &Segment> = input.segments.iter().map(|s| (s.id, s)).collect();

    // 第一步：每位评委在每个环节的细则得分之和
    let mut per_judge: BTreeMap<(i64, i64, i64), f64> = BTreeMap::new();
    for record in &input.judge_scores {
        let is_judge_segment = segments
            .get(&record.segment_id)
            .is_some_and(|s| s.segment_type == SegmentType::Judge);
        if !is_judge_segment {
            continue;
        }
        *per_judge
            .entry((record.candidate_id, record.segment_id, record.judge_id))
            .or_insert(0.0) += record.score;
    }

    // 第二步：在打过分的评委之间取平均
    let mut sums: BTreeMap<(i64, i64), (f64, usize)> = BTreeMap::new();
    for ((candidate_id, segment_id, _), total) in per_judge {
        let entry = sums.entry((candidate_id, segment_id)).or_insert((0.0, 0));
        entry.0 += total;
        entry.1 += 1;
    }

    let mut result: BTreeMap<(i64, i64), f64> = sums
        .into_iter()
        .map(|(key, (sum, judges))| (key, sum / judges as f64))
        .collect();

    // 第三步：管理员环节直接取值
    for record in &input.admin_scores {
        let is_admin_segment = segments
            .get(&record.segment_id)
            .is_some_and(|s| s.segment_type == SegmentType::Admin);
        if is_admin_segment {
            result.insert((record.candidate_id, record.segment_id), record.score);
        }
    }

    result
}

/// 计算每位选手的比赛总分
///
/// 只统计与选手属于同一比赛的环节；返回顺序与 `input.candidates` 一致。
pub fn aggregate(input: &AggregationInput, precision: u32) -> Vec<CandidateTotal> {
    let contest_names: HashMap<i64, &str> = input
        .contests
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let segment_scores = segment_scores(input);

    let mut segments_by_contest: HashMap<i64, Vec<&Segment>> = HashMap::new();
    for segment in &input.segments {
        segments_by_contest
            .entry(segment.contest_id)
            .or_default()
            .push(segment);
    }

    input
        .candidates
        .iter()
        .filter_map(|candidate| {
            let contest_name = contest_names.get(&candidate.contest_id)?;

            // 第四步：按环节权重加权求和
            let mut weighted: Option<f64> = None;
            let mut scored_segments = BTreeMap::new();
            for segment in segments_by_contest
                .get(&candidate.contest_id)
                .map(Vec::as_slice)
                .unwrap_or_default()
            {
                if let Some(score) = segment_scores.get(&(candidate.id, segment.id)) {
                    *weighted.get_or_insert(0.0) += score * segment.percentage / 100.0;
                    scored_segments.insert(segment.id, round_to(*score, precision));
                }
            }

            Some(CandidateTotal {
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                candidate_number: candidate.candidate_number,
                image_url: candidate.image_url.clone(),
                contest_id: candidate.contest_id,
                contest_name: contest_name.to_string(),
                segment_scores: scored_segments,
                total_score: weighted.map(|total| round_to(total, precision)),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::ScoringStatus;

    pub(crate) fn contest(id: i64, name: &str) -> Contest {
        Contest {
            id,
            name: name.to_string(),
            image_url: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub(crate) fn candidate(id: i64, contest_id: i64, number: i32) -> Candidate {
        Candidate {
            id,
            contest_id,
            name: format!("Candidate {number}"),
            candidate_number: number,
            image_url: None,
            display_order: None,
            status: ScoringStatus::Open,
        }
    }

    pub(crate) fn segment(id: i64, contest_id: i64, pct: f64, kind: SegmentType) -> Segment {
        Segment {
            id,
            contest_id,
            name: format!("Segment {id}"),
            percentage: pct,
            segment_type: kind,
            status: ScoringStatus::Open,
        }
    }

    pub(crate) fn judge_score(judge: i64, cand: i64, seg: i64, score: f64) -> JudgeScoreRecord {
        JudgeScoreRecord {
            judge_id: judge,
            candidate_id: cand,
            segment_id: seg,
            score,
        }
    }

    fn talent_interview_input() -> AggregationInput {
        AggregationInput {
            contests: vec![contest(1, "Pageant")],
            candidates: vec![candidate(1, 1, 1)],
            segments: vec![
                segment(10, 1, 60.0, SegmentType::Judge),
                segment(20, 1, 40.0, SegmentType::Admin),
            ],
            judge_scores: vec![
                // 评委 A：技巧 55 + 台风 38
                judge_score(100, 1, 10, 55.0),
                judge_score(100, 1, 10, 38.0),
                // 评委 B：技巧 50 + 台风 40
                judge_score(200, 1, 10, 50.0),
                judge_score(200, 1, 10, 40.0),
            ],
            admin_scores: vec![AdminScoreRecord {
                candidate_id: 1,
                segment_id: 20,
                score: 80.0,
            }],
        }
    }

    #[test]
    fn test_segment_average_over_judges() {
        let scores = segment_scores(&talent_interview_input());
        assert_eq!(scores.get(&(1, 10)), Some(&91.5));
        assert_eq!(scores.get(&(1, 20)), Some(&80.0));
    }

    #[test]
    fn test_weighted_contest_total() {
        let totals = aggregate(&talent_interview_input(), 2);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_score, Some(86.9));
        assert_eq!(totals[0].contest_name, "Pageant");
        assert_eq!(totals[0].segment_scores.get(&10), Some(&91.5));
    }

    #[test]
    fn test_unscored_candidate_has_no_total() {
        let mut input = talent_interview_input();
        input.candidates.push(candidate(2, 1, 2));
        let totals = aggregate(&input, 2);
        assert_eq!(totals[1].candidate_id, 2);
        assert_eq!(totals[1].total_score, None);
        assert!(totals[1].segment_scores.is_empty());
    }

    #[test]
    fn test_missing_segment_drops_its_weight() {
        let mut input = talent_interview_input();
        input.admin_scores.clear();
        let totals = aggregate(&input, 2);
        // 只剩 Talent：91.5 × 0.6
        assert_eq!(totals[0].total_score, Some(54.9));
    }

    #[test]
    fn test_other_candidates_do_not_shift_average() {
        let base = segment_scores(&talent_interview_input());

        let mut input = talent_interview_input();
        input.candidates.push(candidate(2, 1, 2));
        input.judge_scores.push(judge_score(300, 2, 10, 20.0));
        input.judge_scores.push(judge_score(300, 2, 10, 10.0));
        let after = segment_scores(&input);

        assert_eq!(base.get(&(1, 10)), after.get(&(1, 10)));
        assert_eq!(after.get(&(2, 10)), Some(&30.0));
    }

    #[test]
    fn test_full_marks_total_one_hundred() {
        let judges = [1, 2, 3];
        let mut input = AggregationInput {
            contests: vec![contest(1, "Full")],
            candidates: vec![candidate(1, 1, 1)],
            segments: vec![
                segment(1, 1, 30.0, SegmentType::Judge),
                segment(2, 1, 45.0, SegmentType::Judge),
                segment(3, 1, 25.0, SegmentType::Admin),
            ],
            ..Default::default()
        };
        // 每个环节的细则满分之和为 100
        let criteria_max = [(1, vec![33.3, 33.3, 33.4]), (2, vec![70.0, 30.0])];
        for judge in judges {
            for (segment_id, maxes) in &criteria_max {
                for max in maxes {
                    input
                        .judge_scores
                        .push(judge_score(judge, 1, *segment_id, *max));
                }
            }
        }
        input.admin_scores.push(AdminScoreRecord {
            candidate_id: 1,
            segment_id: 3,
            score: 100.0,
        });

        let totals = aggregate(&input, 2);
        let total = totals[0].total_score.unwrap();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_for_mismatched_segment_type_are_ignored() {
        let mut input = talent_interview_input();
        // 管理员分数写到评委环节、评委分数写到管理员环节都不计入
        input.admin_scores.push(AdminScoreRecord {
            candidate_id: 1,
            segment_id: 10,
            score: 0.0,
        });
        input.judge_scores.push(judge_score(100, 1, 20, 99.0));
        let totals = aggregate(&input, 2);
        assert_eq!(totals[0].total_score, Some(86.9));
    }

    #[test]
    fn test_segments_from_other_contests_are_excluded() {
        let mut input = talent_interview_input();
        input.contests.push(contest(2, "Other"));
        input.segments.push(segment(30, 2, 100.0, SegmentType::Admin));
        input.admin_scores.push(AdminScoreRecord {
            candidate_id: 1,
            segment_id: 30,
            score: 100.0,
        });
        let totals = aggregate(&input, 2);
        assert_eq!(totals[0].total_score, Some(86.9));
    }

    #[test]
    fn test_fractional_scores_keep_precision_until_output() {
        let input = AggregationInput {
            contests: vec![contest(1, "C")],
            candidates: vec![candidate(1, 1, 1)],
            segments: vec![segment(1, 1, 100.0, SegmentType::Judge)],
            judge_scores: vec![
                judge_score(1, 1, 1, 10.01),
                judge_score(2, 1, 1, 10.02),
                judge_score(3, 1, 1, 10.02),
            ],
            admin_scores: vec![],
        };
        let totals = aggregate(&input, 2);
        // 平均 10.016666… → 10.02
        assert_eq!(totals[0].total_score, Some(10.02));
        let totals = aggregate(&input, 4);
        assert_eq!(totals[0].total_score, Some(10.0167));
    }
}
