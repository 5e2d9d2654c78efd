mod common;

use contest_tabulation::models::ScoringStatus;
use contest_tabulation::models::scores::requests::{
    CriterionScoreEntry, ScoreEntry, SpecialScoreEntry, SubmitCandidateScoresRequest,
};
use contest_tabulation::services::admin::special_scores::prepare_admin_scores;
use contest_tabulation::services::judging::SubmissionGuard;
use contest_tabulation::services::judging::gateway::{
    commit_batch, prepare_candidate_batch, prepare_segment_batch,
};
use contest_tabulation::storage::Storage;
use contest_tabulation::tabulation::{Leaderboards, aggregate, build_leaderboards};

use common::TalentFixture;

const PRECISION: u32 = 2;

async fn leaderboards(storage: &dyn Storage) -> Leaderboards {
    let input = storage.load_aggregation_input().await.unwrap();
    build_leaderboards(aggregate(&input, PRECISION))
}

async fn score_talent(
    storage: &dyn Storage,
    guard: &SubmissionGuard,
    fixture: &TalentFixture,
    judge_id: i64,
    sheet: &[(i64, f64, f64)],
) {
    let entries: Vec<ScoreEntry> = sheet
        .iter()
        .flat_map(|&(candidate_id, skill, presence)| {
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
        .collect();
    let batch = prepare_segment_batch(storage, judge_id, &entries)
        .await
        .unwrap();
    commit_batch(storage, guard, batch).await.unwrap();
}

async fn score_one(
    storage: &dyn Storage,
    guard: &SubmissionGuard,
    fixture: &TalentFixture,
    judge_id: i64,
    (candidate_id, skill, presence): (i64, f64, f64),
) {
    let request = SubmitCandidateScoresRequest {
        segment_id: fixture.segment.id,
        candidate_id,
        scores: vec![
            CriterionScoreEntry {
                criterion_id: fixture.skill.id,
                score: skill,
            },
            CriterionScoreEntry {
                criterion_id: fixture.presence.id,
                score: presence,
            },
        ],
    };
    let batch = prepare_candidate_batch(storage, judge_id, &request)
        .await
        .unwrap();
    commit_batch(storage, guard, batch).await.unwrap();
}

#[tokio::test]
async fn test_segment_average_and_weighted_total() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let fixture = common::talent_fixture(storage, 60.0).await;
    let interview = common::admin_segment(storage, fixture.contest.id, "Interview", 40.0).await;
    let judge_a = common::judge(storage, "judge_a").await;
    let judge_b = common::judge(storage, "judge_b").await;
    let c1 = common::candidate(storage, fixture.contest.id, 1).await;
    let guard = SubmissionGuard::new();

    score_talent(storage, &guard, &fixture, judge_a.id, &[(c1.id, 55.0, 38.0)]).await;
    score_talent(storage, &guard, &fixture, judge_b.id, &[(c1.id, 50.0, 40.0)]).await;

    let rows = prepare_admin_scores(
        storage,
        &[SpecialScoreEntry {
            candidate_id: c1.id,
            segment_id: interview.id,
            score: 80.0,
        }],
    )
    .await
    .unwrap();
    storage.upsert_admin_scores(rows).await.unwrap();

    let boards = leaderboards(storage).await;
    let board = boards.contest("Pageant").unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].segment_scores[&fixture.segment.id], 91.5);
    assert_eq!(board[0].segment_scores[&interview.id], 80.0);
    assert!((board[0].total_score.unwrap() - 86.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_average_counts_only_judges_who_scored() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let fixture = common::talent_fixture(storage, 100.0).await;
    let judge_a = common::judge(storage, "judge_a").await;
    let judge_b = common::judge(storage, "judge_b").await;
    let c1 = common::candidate(storage, fixture.contest.id, 1).await;
    let c2 = common::candidate(storage, fixture.contest.id, 2).await;
    let guard = SubmissionGuard::new();

    let sheet = [(c1.id, 55.0, 38.0), (c2.id, 40.0, 30.0)];
    score_talent(storage, &guard, &fixture, judge_a.id, &sheet).await;
    let before = leaderboards(storage).await;
    let c1_before = before
        .contest("Pageant")
        .unwrap()
        .iter()
        .find(|r| r.candidate_id == c1.id)
        .unwrap()
        .total_score;
    assert_eq!(c1_before, Some(93.0));

    // 评委 B 只给选手 2 打分
    score_one(storage, &guard, &fixture, judge_b.id, (c2.id, 60.0, 40.0)).await;

    let after = leaderboards(storage).await;
    let board = after.contest("Pageant").unwrap();
    let c1_after = board.iter().find(|r| r.candidate_id == c1.id).unwrap();
    let c2_after = board.iter().find(|r| r.candidate_id == c2.id).unwrap();
    assert_eq!(c1_after.total_score, Some(93.0));
    assert_eq!(c2_after.total_score, Some(85.0));
    assert_eq!(board[0].candidate_id, c1.id);
    assert_eq!(board[0].rank, 1);
}

#[tokio::test]
async fn test_full_marks_roll_up_to_one_hundred() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let contest = common::contest(storage, "Oratorical").await;
    let c1 = common::candidate(storage, contest.id, 1).await;
    let guard = SubmissionGuard::new();

    let mut sheets = Vec::new();
    for (name, percentage, maxes) in [
        ("Content", 35.0, vec![30.0, 45.0, 25.0]),
        ("Delivery", 45.0, vec![70.0, 30.0]),
        ("Rebuttal", 20.0, vec![100.0]),
    ] {
        let segment = common::judge_segment(storage, contest.id, name, percentage).await;
        let mut criteria = Vec::new();
        for (i, max) in maxes.into_iter().enumerate() {
            let label = format!("{name} {i}");
            criteria.push(common::criterion(storage, segment.id, &label, max).await);
        }
        sheets.push(criteria);
    }

    for username in ["judge_a", "judge_b", "judge_c"] {
        let judge = common::judge(storage, username).await;
        for criteria in &sheets {
            let entries: Vec<ScoreEntry> = criteria
                .iter()
                .map(|c| ScoreEntry {
                    candidate_id: c1.id,
                    criterion_id: c.id,
                    score: c.max_score,
                })
                .collect();
            let batch = prepare_segment_batch(storage, judge.id, &entries)
                .await
                .unwrap();
            commit_batch(storage, &guard, batch).await.unwrap();
        }
    }

    let boards = leaderboards(storage).await;
    let total = boards.contest("Oratorical").unwrap()[0].total_score.unwrap();
    assert!((total - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_admin_score_keeps_latest_value_only() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let contest = common::contest(storage, "Pageant").await;
    let interview = common::admin_segment(storage, contest.id, "Interview", 100.0).await;
    let c1 = common::candidate(storage, contest.id, 5).await;

    for score in [88.0, 92.0] {
        let rows = prepare_admin_scores(
            storage,
            &[SpecialScoreEntry {
                candidate_id: c1.id,
                segment_id: interview.id,
                score,
            }],
        )
        .await
        .unwrap();
        storage.upsert_admin_scores(rows).await.unwrap();
    }

    let stored = storage.list_admin_scores_by_contest(contest.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].score, 92.0);

    let boards = leaderboards(storage).await;
    assert_eq!(boards.contest("Pageant").unwrap()[0].total_score, Some(92.0));
}

#[tokio::test]
async fn test_admin_scores_reject_judge_segments_and_foreign_contests() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let fixture = common::talent_fixture(storage, 60.0).await;
    let other = common::contest(storage, "Debate").await;
    let other_admin = common::admin_segment(storage, other.id, "Attendance", 10.0).await;
    let c1 = common::candidate(storage, fixture.contest.id, 1).await;

    let judge_segment = prepare_admin_scores(
        storage,
        &[SpecialScoreEntry {
            candidate_id: c1.id,
            segment_id: fixture.segment.id,
            score: 50.0,
        }],
    )
    .await;
    assert!(judge_segment.is_err());

    let foreign = prepare_admin_scores(
        storage,
        &[SpecialScoreEntry {
            candidate_id: c1.id,
            segment_id: other_admin.id,
            score: 50.0,
        }],
    )
    .await;
    assert!(foreign.is_err());
}

#[tokio::test]
async fn test_closed_candidate_hidden_from_judges_but_still_ranked() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let fixture = common::talent_fixture(storage, 100.0).await;
    let judge = common::judge(storage, "judge_a").await;
    let c1 = common::candidate(storage, fixture.contest.id, 1).await;
    let c2 = common::candidate(storage, fixture.contest.id, 2).await;
    let guard = SubmissionGuard::new();

    let sheet = [(c1.id, 55.0, 38.0), (c2.id, 50.0, 30.0)];
    score_talent(storage, &guard, &fixture, judge.id, &sheet).await;
    storage
        .update_candidate_status(c2.id, ScoringStatus::Closed)
        .await
        .unwrap();

    let visible = storage
        .list_candidates_by_contest(fixture.contest.id, true)
        .await
        .unwrap();
    assert_eq!(visible.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c1.id]);

    let boards = leaderboards(storage).await;
    let board = boards.contest("Pageant").unwrap();
    assert_eq!(board.len(), 2);
    let closed = board.iter().find(|r| r.candidate_id == c2.id).unwrap();
    assert_eq!(closed.total_score, Some(80.0));
}

#[tokio::test]
async fn test_deleting_segment_cascades_to_scores() {
    let storage = common::memory_storage().await;
    let storage = storage.as_ref();
    let fixture = common::talent_fixture(storage, 60.0).await;
    let interview = common::judge_segment(storage, fixture.contest.id, "Interview", 40.0).await;
    let poise = common::criterion(storage, interview.id, "Poise", 100.0).await;
    let judge = common::judge(storage, "judge_a").await;
    let c1 = common::candidate(storage, fixture.contest.id, 1).await;
    let guard = SubmissionGuard::new();

    score_talent(storage, &guard, &fixture, judge.id, &[(c1.id, 60.0, 40.0)]).await;
    let entries = [ScoreEntry {
        candidate_id: c1.id,
        criterion_id: poise.id,
        score: 50.0,
    }];
    let batch = prepare_segment_batch(storage, judge.id, &entries)
        .await
        .unwrap();
    commit_batch(storage, &guard, batch).await.unwrap();

    let boards = leaderboards(storage).await;
    assert_eq!(boards.contest("Pageant").unwrap()[0].total_score, Some(80.0));

    assert!(storage.delete_segment(interview.id).await.unwrap());
    assert_eq!(storage.count_scores().await.unwrap(), 2);

    let boards = leaderboards(storage).await;
    let row = &boards.contest("Pageant").unwrap()[0];
    assert!(!row.segment_scores.contains_key(&interview.id));
    assert_eq!(row.total_score, Some(60.0));

    assert!(storage.delete_contest(fixture.contest.id).await.unwrap());
    assert_eq!(storage.count_scores().await.unwrap(), 0);
    assert!(leaderboards(storage).await.0.is_empty());
}
