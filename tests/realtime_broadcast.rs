mod common;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use contest_tabulation::models::AppStartTime;
use contest_tabulation::models::scores::requests::{
    CriterionScoreEntry, SubmitCandidateScoresRequest,
};
use contest_tabulation::models::users::entities::UserRole;
use contest_tabulation::realtime::registry::Frame;
use contest_tabulation::realtime::{ConnectedUser, ConnectionRegistry, RankingBroadcaster};
use contest_tabulation::services::judging::SubmissionGuard;
use contest_tabulation::services::judging::gateway::{commit_batch, prepare_candidate_batch};
use contest_tabulation::storage::Storage;

async fn broadcaster() -> (RankingBroadcaster, Arc<dyn Storage>) {
    let storage = common::memory_storage().await;
    let registry = Arc::new(ConnectionRegistry::new(16));
    let broadcaster = RankingBroadcaster::new(registry, storage.clone(), 2, AppStartTime::now());
    (broadcaster, storage)
}

fn identity(user_id: i64, role: UserRole, session: &str) -> ConnectedUser {
    ConnectedUser {
        user_id,
        username: format!("user{user_id}"),
        role,
        session_id: session.to_string(),
    }
}

fn drain(rx: &mut mpsc::Receiver<Frame>) -> Vec<Frame> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

fn event_names(frames: &[Frame]) -> Vec<String> {
    frames
        .iter()
        .map(|f| {
            let value: Value = serde_json::from_str(f).unwrap();
            value["event"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_republishing_unchanged_data_is_byte_identical() {
    let (broadcaster, storage) = broadcaster().await;
    let fixture = common::talent_fixture(storage.as_ref(), 100.0).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let c1 = common::candidate(storage.as_ref(), fixture.contest.id, 1).await;
    let _c2 = common::candidate(storage.as_ref(), fixture.contest.id, 2).await;

    // 选手 2 尚未评分，榜单上总分为空
    let request = SubmitCandidateScoresRequest {
        segment_id: fixture.segment.id,
        candidate_id: c1.id,
        scores: vec![
            CriterionScoreEntry {
                criterion_id: fixture.skill.id,
                score: 55.0,
            },
            CriterionScoreEntry {
                criterion_id: fixture.presence.id,
                score: 38.0,
            },
        ],
    };
    let batch = prepare_candidate_batch(storage.as_ref(), judge.id, &request)
        .await
        .unwrap();
    commit_batch(storage.as_ref(), &SubmissionGuard::new(), batch)
        .await
        .unwrap();

    let (_, mut rx) = broadcaster.registry().register();
    broadcaster.publish_results().await;
    broadcaster.publish_results().await;

    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].as_bytes(), frames[1].as_bytes());

    let value: Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(value["event"], "update_results");
    let board = value["data"]["Pageant"].as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["candidate_id"], c1.id);
    assert_eq!(board[0]["total_score"], 93.0);
    assert!(board[1]["total_score"].is_null());
}

#[tokio::test]
async fn test_kpis_reach_admins_only() {
    let (broadcaster, storage) = broadcaster().await;
    let admin = common::user(storage.as_ref(), "admin", UserRole::Admin).await;
    let judge = common::judge(storage.as_ref(), "judge_a").await;
    let registry = broadcaster.registry();

    let (admin_conn, mut admin_rx) = registry.register();
    let (judge_conn, mut judge_rx) = registry.register();
    let (_, mut anonymous_rx) = registry.register();
    assert!(registry.authenticate(admin_conn, identity(admin.id, UserRole::Admin, "s-admin")));
    assert!(registry.authenticate(judge_conn, identity(judge.id, UserRole::Judge, "s-judge")));

    broadcaster.publish_kpis().await;

    let admin_frames = drain(&mut admin_rx);
    assert_eq!(event_names(&admin_frames), vec!["kpi_update"]);
    let value: Value = serde_json::from_str(&admin_frames[0]).unwrap();
    assert_eq!(value["data"]["connection_count"], 3);
    assert_eq!(value["data"]["total_scores_submitted"], 0);
    assert_eq!(value["data"]["active_users"].as_array().unwrap().len(), 2);

    assert!(drain(&mut judge_rx).is_empty());
    assert!(drain(&mut anonymous_rx).is_empty());
}

#[tokio::test]
async fn test_scores_changed_fans_out_in_order() {
    let (broadcaster, storage) = broadcaster().await;
    let admin = common::user(storage.as_ref(), "admin", UserRole::Superadmin).await;
    let registry = broadcaster.registry();

    let (admin_conn, mut admin_rx) = registry.register();
    let (_, mut public_rx) = registry.register();
    registry.authenticate(admin_conn, identity(admin.id, UserRole::Superadmin, "s1"));

    broadcaster.scores_changed().await;

    assert_eq!(
        event_names(&drain(&mut public_rx)),
        vec!["update_results", "judging_progress_updated"]
    );
    assert_eq!(
        event_names(&drain(&mut admin_rx)),
        vec!["update_results", "judging_progress_updated", "kpi_update"]
    );
}

#[tokio::test]
async fn test_force_logout_targets_previous_session() {
    let (broadcaster, _storage) = broadcaster().await;
    let registry = broadcaster.registry();

    let (old_conn, mut old_rx) = registry.register();
    let (new_conn, mut new_rx) = registry.register();
    registry.authenticate(old_conn, identity(7, UserRole::Judge, "old-session"));
    registry.authenticate(new_conn, identity(7, UserRole::Judge, "new-session"));

    let delivered = registry
        .force_logout_session("old-session", "Logged in from another device")
        .unwrap();
    assert_eq!(delivered, 1);

    let frames = drain(&mut old_rx);
    assert_eq!(event_names(&frames), vec!["force_logout"]);
    let value: Value = serde_json::from_str(&frames[0]).unwrap();
    assert_eq!(value["data"]["reason"], "Logged in from another device");

    assert!(registry.user_of(old_conn).is_none());
    assert_eq!(registry.user_of(new_conn).unwrap().session_id, "new-session");
    assert!(drain(&mut new_rx).is_empty());
}
