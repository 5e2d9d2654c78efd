//! 评分提交网关
//!
//! 两种提交方式共享同一套校验：
//! - 整环节提交：评委一次提交比赛内全部开放选手的全部细则得分，环节由细则推导；
//! - 单选手提交：评委只锁定一名选手在该环节的全部细则得分。
//!
//! 比赛 ID 一律从选手记录推导，不信任客户端。任意一条不合法则整批拒绝。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors::{Result, TabulationError};
use crate::models::candidates::entities::Candidate;
use crate::models::criteria::entities::Criterion;
use crate::models::scores::{
    entities::{LockScope, NewScore},
    requests::{ScoreEntry, SubmitCandidateScoresRequest},
};
use crate::models::segments::entities::{Segment, SegmentType};
use crate::storage::Storage;
use crate::utils::validate::validate_score;

use super::guard::SubmissionGuard;

/// 通过校验、等待写入的一批评分
#[derive(Debug, Clone)]
pub struct ScoreBatch {
    pub judge_id: i64,
    pub segment_id: i64,
    pub contest_id: i64,
    pub scope: LockScope,
    pub rows: Vec<NewScore>,
}

async fn load_open_segment(storage: &dyn Storage, segment_id: i64) -> Result<Segment> {
    let segment = storage
        .get_segment_by_id(segment_id)
        .await?
        .ok_or_else(|| TabulationError::not_found(format!("Segment {segment_id} not found")))?;

    if segment.segment_type != SegmentType::Judge {
        return Err(TabulationError::validation(format!(
            "Segment '{}' is not scored by judges",
            segment.name
        )));
    }
    if !segment.status.is_open() {
        return Err(TabulationError::validation(format!(
            "Segment '{}' is not open for judging",
            segment.name
        )));
    }
    Ok(segment)
}

fn check_candidate(candidate: &Candidate, segment: &Segment) -> Result<()> {
    if candidate.contest_id != segment.contest_id {
        return Err(TabulationError::validation(format!(
            "Candidate {} does not belong to the contest of segment '{}'",
            candidate.id, segment.name
        )));
    }
    if !candidate.status.is_open() {
        return Err(TabulationError::validation(format!(
            "Candidate #{} is closed for scoring",
            candidate.candidate_number
        )));
    }
    Ok(())
}

// 每名选手必须恰好覆盖环节的全部细则，且分数在 [0, max_score] 内
fn build_rows(
    judge_id: i64,
    segment: &Segment,
    criteria: &[Criterion],
    entries: &[(i64, i64, f64)],
) -> Result<Vec<NewScore>> {
    if criteria.is_empty() {
        return Err(TabulationError::validation(format!(
            "Segment '{}' has no criteria",
            segment.name
        )));
    }
    let by_id: HashMap<i64, &Criterion> = criteria.iter().map(|c| (c.id, c)).collect();

    let mut seen: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    let mut rows = Vec::with_capacity(entries.len());

    for &(candidate_id, criterion_id, score) in entries {
        let criterion = by_id.get(&criterion_id).ok_or_else(|| {
            TabulationError::validation(format!(
                "Criterion {criterion_id} does not belong to segment '{}'",
                segment.name
            ))
        })?;

        validate_score(score, criterion.max_score).map_err(|msg| {
            TabulationError::validation(format!("{} (candidate {candidate_id}): {msg}", criterion.name))
        })?;

        if !seen.entry(candidate_id).or_default().insert(criterion_id) {
            return Err(TabulationError::validation(format!(
                "Duplicate score for candidate {candidate_id} on criterion '{}'",
                criterion.name
            )));
        }

        rows.push(NewScore {
            judge_id,
            candidate_id,
            criterion_id,
            segment_id: segment.id,
            contest_id: segment.contest_id,
            score,
        });
    }

    for (candidate_id, scored) in &seen {
        if let Some(missing) = criteria.iter().find(|c| !scored.contains(&c.id)) {
            return Err(TabulationError::validation(format!(
                "Missing score for candidate {candidate_id} on criterion '{}'",
                missing.name
            )));
        }
    }

    Ok(rows)
}

/// 校验整环节提交
pub async fn prepare_segment_batch(
    storage: &dyn Storage,
    judge_id: i64,
    entries: &[ScoreEntry],
) -> Result<ScoreBatch> {
    let first = entries
        .first()
        .ok_or_else(|| TabulationError::validation("No scores submitted"))?;

    // 环节由细则推导，所有细则必须属于同一环节
    let criterion_ids: Vec<i64> = entries
        .iter()
        .map(|e| e.criterion_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let submitted_criteria = storage.get_criteria_by_ids(&criterion_ids).await?;
    if submitted_criteria.len() != criterion_ids.len() {
        let known: BTreeSet<i64> = submitted_criteria.iter().map(|c| c.id).collect();
        let unknown = criterion_ids
            .iter()
            .find(|id| !known.contains(id))
            .copied()
            .unwrap_or(first.criterion_id);
        return Err(TabulationError::not_found(format!(
            "Criterion {unknown} not found"
        )));
    }
    let segment_ids: BTreeSet<i64> = submitted_criteria.iter().map(|c| c.segment_id).collect();
    if segment_ids.len() != 1 {
        return Err(TabulationError::validation(
            "All scores in one submission must belong to the same segment",
        ));
    }
    let segment_id = submitted_criteria[0].segment_id;
    let segment = load_open_segment(storage, segment_id).await?;

    let candidate_ids: Vec<i64> = entries
        .iter()
        .map(|e| e.candidate_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let candidates = storage.get_candidates_by_ids(&candidate_ids).await?;
    let candidates: HashMap<i64, Candidate> = candidates.into_iter().map(|c| (c.id, c)).collect();
    for id in &candidate_ids {
        let candidate = candidates
            .get(id)
            .ok_or_else(|| TabulationError::not_found(format!("Candidate {id} not found")))?;
        check_candidate(candidate, &segment)?;
    }

    // 比赛取自第一名选手，其余选手已确认同属该比赛
    let contest_id = candidates
        .get(&first.candidate_id)
        .map(|c| c.contest_id)
        .ok_or_else(|| {
            TabulationError::not_found(format!("Candidate {} not found", first.candidate_id))
        })?;

    // 整环节提交必须覆盖比赛内全部开放选手，遗漏任何一名即整批拒绝
    let open_candidates = storage
        .list_candidates_by_contest(segment.contest_id, true)
        .await?;
    let submitted: BTreeSet<i64> = candidate_ids.iter().copied().collect();
    if let Some(missing) = open_candidates
        .iter()
        .find(|c| !submitted.contains(&c.id))
    {
        return Err(TabulationError::validation(format!(
            "Missing scores for candidate #{} in segment '{}'",
            missing.candidate_number, segment.name
        )));
    }

    let criteria = storage.list_criteria_by_segment(segment.id).await?;
    let triples: Vec<(i64, i64, f64)> = entries
        .iter()
        .map(|e| (e.candidate_id, e.criterion_id, e.score))
        .collect();
    let rows = build_rows(judge_id, &segment, &criteria, &triples)?;

    Ok(ScoreBatch {
        judge_id,
        segment_id: segment.id,
        contest_id,
        scope: LockScope::Segment,
        rows,
    })
}

/// 校验单选手提交
pub async fn prepare_candidate_batch(
    storage: &dyn Storage,
    judge_id: i64,
    request: &SubmitCandidateScoresRequest,
) -> Result<ScoreBatch> {
    if request.scores.is_empty() {
        return Err(TabulationError::validation("No scores submitted"));
    }

    let segment = load_open_segment(storage, request.segment_id).await?;
    let candidate = storage
        .get_candidate_by_id(request.candidate_id)
        .await?
        .ok_or_else(|| {
            TabulationError::not_found(format!("Candidate {} not found", request.candidate_id))
        })?;
    check_candidate(&candidate, &segment)?;

    let criteria = storage.list_criteria_by_segment(segment.id).await?;
    let triples: Vec<(i64, i64, f64)> = request
        .scores
        .iter()
        .map(|e| (candidate.id, e.criterion_id, e.score))
        .collect();
    let rows = build_rows(judge_id, &segment, &criteria, &triples)?;

    Ok(ScoreBatch {
        judge_id,
        segment_id: segment.id,
        contest_id: candidate.contest_id,
        scope: LockScope::Candidate(candidate.id),
        rows,
    })
}

/// 串行化后在单个事务内写入，已提交时返回 Conflict
pub async fn commit_batch(
    storage: &dyn Storage,
    guard: &SubmissionGuard,
    batch: ScoreBatch,
) -> Result<usize> {
    let _lock = guard.acquire(batch.judge_id, batch.segment_id).await;
    storage
        .insert_score_batch(batch.judge_id, batch.segment_id, batch.scope, batch.rows)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::ScoringStatus;

    fn segment() -> Segment {
        Segment {
            id: 7,
            contest_id: 1,
            name: "Talent".to_string(),
            percentage: 60.0,
            segment_type: SegmentType::Judge,
            status: ScoringStatus::Open,
        }
    }

    fn criteria() -> Vec<Criterion> {
        vec![
            Criterion {
                id: 1,
                segment_id: 7,
                name: "Skill".to_string(),
                max_score: 60.0,
            },
            Criterion {
                id: 2,
                segment_id: 7,
                name: "Stage Presence".to_string(),
                max_score: 40.0,
            },
        ]
    }

    #[test]
    fn test_complete_batch_builds_rows() {
        let rows = build_rows(
            9,
            &segment(),
            &criteria(),
            &[(3, 1, 55.0), (3, 2, 38.0), (4, 1, 60.0), (4, 2, 0.0)],
        )
        .unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.segment_id == 7 && r.contest_id == 1));
        assert!(rows.iter().all(|r| r.judge_id == 9));
    }

    #[test]
    fn test_out_of_range_rejects_batch() {
        let err = build_rows(9, &segment(), &criteria(), &[(3, 1, 61.0), (3, 2, 10.0)])
            .unwrap_err();
        assert_eq!(err.code(), "E004");
        let err = build_rows(9, &segment(), &criteria(), &[(3, 1, -1.0), (3, 2, 10.0)])
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_missing_criterion_rejects_batch() {
        let err = build_rows(9, &segment(), &criteria(), &[(3, 1, 10.0)]).unwrap_err();
        assert!(err.message().contains("Missing score"));
    }

    #[test]
    fn test_duplicate_and_foreign_criterion_rejected() {
        let dup = build_rows(
            9,
            &segment(),
            &criteria(),
            &[(3, 1, 10.0), (3, 1, 11.0), (3, 2, 5.0)],
        )
        .unwrap_err();
        assert!(dup.message().contains("Duplicate"));

        let foreign =
            build_rows(9, &segment(), &criteria(), &[(3, 1, 10.0), (3, 99, 5.0)]).unwrap_err();
        assert!(foreign.message().contains("does not belong"));
    }

    #[test]
    fn test_closed_candidate_rejected() {
        let candidate = Candidate {
            id: 3,
            contest_id: 1,
            name: "A".to_string(),
            candidate_number: 1,
            image_url: None,
            display_order: None,
            status: ScoringStatus::Closed,
        };
        assert!(check_candidate(&candidate, &segment()).is_err());

        let other_contest = Candidate {
            contest_id: 2,
            status: ScoringStatus::Open,
            ..candidate
        };
        assert!(check_candidate(&other_contest, &segment()).is_err());
    }
}
