mod common;

use std::sync::Arc;

use contest_tabulation::errors::TabulationError;
use contest_tabulation::models::ScoringStatus;
use contest_tabulation::models::scores::entities::{LockScope, NewScore};
use contest_tabulation::models::scores::requests::{
    CriterionScoreEntry, ScoreEntry, SubmitCandidateScoresRequest,
};
use contest_tabulation::services::judging::gateway::{
    commit_batch, prepare_candidate_batch, prepare_segment_batch,
};
use contest_tabulation::services::judging::SubmissionGuard;
use contest_tabulation::services::judging::list_contests::pending_contests;
use contest_tabulation::storage::Storage;

use common::TalentFixture;

fn full_sheet(
    fixture: &TalentFixture,
    candidate_ids: &[i64],
    skill: f64,
    presence: f64,
) -> Vec<ScoreEntry> {
    candidate_ids
        .iter()
        .flat_map(|&candidate_id| {
            [
                ScoreEntry {
                    candidate_id,
                    criterion_id: fixture.skill.id,
                    score: skill,
                },
                ScoreEntry {
                    candidate_id,
                    criterion_id: fixture.presence.id,
                    score: presence,
                },
            ]
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_commit_once() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;

    let sheet = full_sheet(&fixture, &[c1.id, c2.id], 50.0, 30.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    let guard = Arc::new(SubmissionGuard::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let storage = storage.clone();
        let guard = guard.clone();
        let batch = batch.clone();
        handles.push(tokio::spawn(async move {
            commit_batch(storage.as_ref(), &guard, batch).await
        }));
    }

    let mut committed = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(rows) => {
                assert_eq!(rows, 4);
                committed += 1;
            }
            Err(TabulationError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(committed, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(storage.count_scores().await.unwrap(), 4);
}

#[tokio::test]
async fn test_resubmission_is_rejected_and_store_unchanged() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let mut ids = Vec::new();
    for number in 1..=3 {
        let candidate = common::candidate(storage.as_ref(), fixture.contest.id, number).await;
        ids.push(candidate.id);
    }
    let guard = SubmissionGuard::new();

    let sheet = full_sheet(&fixture, &ids, 55.0, 38.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    assert_eq!(commit_batch(storage.as_ref(), &guard, batch).await.unwrap(), 6);
    let after_first = storage
        .list_judge_scores(judge.id, fixture.segment.id)
        .await
        .unwrap();

    let retry = full_sheet(&fixture, &ids, 10.0, 10.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &retry)
        .await
        .unwrap();
    let err = commit_batch(storage.as_ref(), &guard, batch)
        .await
        .unwrap_err();
    assert!(matches!(err, TabulationError::Conflict(_)));

    let after_retry = storage
        .list_judge_scores(judge.id, fixture.segment.id)
        .await
        .unwrap();
    assert_eq!(after_first.len(), after_retry.len());
    assert!(after_retry.iter().all(|row| row.score == 55.0 || row.score == 38.0));
}

#[tokio::test]
async fn test_unlock_allows_resubmission_without_ghost_rows() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;
    let guard = SubmissionGuard::new();

    let sheet = full_sheet(&fixture, &[c1.id, c2.id], 55.0, 38.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    commit_batch(storage.as_ref(), &guard, batch).await.unwrap();
    assert_eq!(
        storage
            .locked_candidate_ids(judge.id, fixture.segment.id)
            .await
            .unwrap(),
        vec![c1.id, c2.id]
    );

    let removed = storage
        .delete_scores(judge.id, fixture.segment.id, LockScope::Segment)
        .await
        .unwrap();
    assert_eq!(removed, 4);
    assert!(
        storage
            .locked_candidate_ids(judge.id, fixture.segment.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        !storage
            .has_submitted(judge.id, fixture.segment.id, LockScope::Segment)
            .await
            .unwrap()
    );

    // 解锁后重新提交，只剩新分数
    let sheet = full_sheet(&fixture, &[c1.id, c2.id], 40.0, 20.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    commit_batch(storage.as_ref(), &guard, batch).await.unwrap();

    let input = storage.load_aggregation_input().await.unwrap();
    let total: f64 = input.judge_scores.iter().map(|r| r.score).sum();
    assert_eq!(input.judge_scores.len(), 4);
    assert_eq!(total, 120.0);
}

#[tokio::test]
async fn test_segment_batch_must_cover_every_open_candidate() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;
    let _closed = common::candidate_with_status(
        storage.as_ref(),
        fixture.contest.id,
        3,
        ScoringStatus::Closed,
    )
    .await;

    let sheet = full_sheet(&fixture, &[c1.id], 50.0, 30.0);
    let err = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap_err();
    assert!(matches!(err, TabulationError::Validation(_)));
    assert!(err.message().contains("candidate #2"));
    assert_eq!(storage.count_scores().await.unwrap(), 0);

    // 已关闭的选手不要求覆盖
    let sheet = full_sheet(&fixture, &[c1.id, c2.id], 50.0, 30.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    assert_eq!(batch.rows.len(), 4);
}

#[tokio::test]
async fn test_unique_index_rejects_rows_outside_the_checked_scope() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;
    let guard = SubmissionGuard::new();

    let request = SubmitCandidateScoresRequest {
        segment_id: fixture.segment.id,
        candidate_id: c1.id,
        scores: vec![
            CriterionScoreEntry {
                criterion_id: fixture.skill.id,
                score: 45.0,
            },
            CriterionScoreEntry {
                criterion_id: fixture.presence.id,
                score: 35.0,
            },
        ],
    };
    let batch = prepare_candidate_batch(storage.as_ref(), judge.id, &request)
        .await
        .unwrap();
    commit_batch(storage.as_ref(), &guard, batch).await.unwrap();

    // 范围检查只看选手 2，选手 1 的重复行由唯一索引拦下，整批回滚
    let rows = vec![
        NewScore {
            judge_id: judge.id,
            candidate_id: c2.id,
            criterion_id: fixture.skill.id,
            segment_id: fixture.segment.id,
            contest_id: fixture.contest.id,
            score: 10.0,
        },
        NewScore {
            judge_id: judge.id,
            candidate_id: c1.id,
            criterion_id: fixture.skill.id,
            segment_id: fixture.segment.id,
            contest_id: fixture.contest.id,
            score: 10.0,
        },
    ];
    let err = storage
        .insert_score_batch(judge.id, fixture.segment.id, LockScope::Candidate(c2.id), rows)
        .await
        .unwrap_err();
    assert!(matches!(err, TabulationError::Conflict(_)));

    assert_eq!(storage.count_scores().await.unwrap(), 2);
    assert_eq!(
        storage
            .locked_candidate_ids(judge.id, fixture.segment.id)
            .await
            .unwrap(),
        vec![c1.id]
    );
}

#[tokio::test]
async fn test_candidate_lock_is_independent_per_candidate() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;
    let guard = SubmissionGuard::new();

    let request = |candidate_id: i64| SubmitCandidateScoresRequest {
        segment_id: fixture.segment.id,
        candidate_id,
        scores: vec![
            CriterionScoreEntry {
                criterion_id: fixture.skill.id,
                score: 45.0,
            },
            CriterionScoreEntry {
                criterion_id: fixture.presence.id,
                score: 35.0,
            },
        ],
    };

    let batch = prepare_candidate_batch(storage.as_ref(), judge.id, &request(c1.id))
        .await
        .unwrap();
    assert_eq!(batch.scope, LockScope::Candidate(c1.id));
    assert_eq!(batch.contest_id, fixture.contest.id);
    commit_batch(storage.as_ref(), &guard, batch).await.unwrap();

    let batch = prepare_candidate_batch(storage.as_ref(), judge.id, &request(c1.id))
        .await
        .unwrap();
    assert!(matches!(
        commit_batch(storage.as_ref(), &guard, batch).await,
        Err(TabulationError::Conflict(_))
    ));

    let batch = prepare_candidate_batch(storage.as_ref(), judge.id, &request(c2.id))
        .await
        .unwrap();
    assert_eq!(commit_batch(storage.as_ref(), &guard, batch).await.unwrap(), 2);

    // 只解锁选手 1，选手 2 仍锁定
    storage
        .delete_scores(judge.id, fixture.segment.id, LockScope::Candidate(c1.id))
        .await
        .unwrap();
    assert_eq!(
        storage
            .locked_candidate_ids(judge.id, fixture.segment.id)
            .await
            .unwrap(),
        vec![c2.id]
    );
}

#[tokio::test]
async fn test_invalid_batches_are_rejected_whole() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let closed = common::candidate_with_status(
        storage.as_ref(),
        fixture.contest.id,
        2,
        ScoringStatus::Closed,
    )
    .await;

    // 超出细则满分
    let sheet = full_sheet(&fixture, &[c1.id], 61.0, 30.0);
    assert!(matches!(
        prepare_segment_batch(storage.as_ref(), judge.id, &sheet).await,
        Err(TabulationError::Validation(_))
    ));

    // 缺少一项细则
    let partial = vec![ScoreEntry {
        candidate_id: c1.id,
        criterion_id: fixture.skill.id,
        score: 50.0,
    }];
    assert!(matches!(
        prepare_segment_batch(storage.as_ref(), judge.id, &partial).await,
        Err(TabulationError::Validation(_))
    ));

    // 已关闭的选手
    let sheet = full_sheet(&fixture, &[c1.id, closed.id], 50.0, 30.0);
    assert!(prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .is_err());

    // 环节关闭后不再接受评分
    storage
        .update_segment_status(fixture.segment.id, ScoringStatus::Closed)
        .await
        .unwrap();
    let sheet = full_sheet(&fixture, &[c1.id], 50.0, 30.0);
    assert!(prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .is_err());

    assert_eq!(storage.count_scores().await.unwrap(), 0);
}

#[tokio::test]
async fn test_pending_contests_follow_submission_state() {
    let storage = common::memory_storage().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let guard = SubmissionGuard::new();

    let pending = pending_contests(storage.as_ref(), judge.id).await.unwrap();
    assert_eq!(pending.len(), 1);

    let sheet = full_sheet(&fixture, &[c1.id], 50.0, 30.0);
    let batch = prepare_segment_batch(storage.as_ref(), judge.id, &sheet)
        .await
        .unwrap();
    commit_batch(storage.as_ref(), &guard, batch).await.unwrap();
    assert!(
        pending_contests(storage.as_ref(), judge.id)
            .await
            .unwrap()
            .is_empty()
    );

    storage
        .delete_scores(judge.id, fixture.segment.id, LockScope::Segment)
        .await
        .unwrap();
    assert_eq!(
        pending_contests(storage.as_ref(), judge.id)
            .await
            .unwrap()
            .len(),
        1
    );
}
