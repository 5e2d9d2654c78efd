//! 集成测试共用的内存数据库与数据构造
#![allow(dead_code)]

use std::sync::Arc;

use contest_tabulation::models::ScoringStatus;
use contest_tabulation::models::candidates::{
    entities::Candidate, requests::CreateCandidateRequest,
};
use contest_tabulation::models::contests::{entities::Contest, requests::CreateContestRequest};
use contest_tabulation::models::criteria::{entities::Criterion, requests::CreateCriterionRequest};
use contest_tabulation::models::segments::{
    entities::{Segment, SegmentType},
    requests::CreateSegmentRequest,
};
use contest_tabulation::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use contest_tabulation::storage::Storage;
use contest_tabulation::storage::sea_orm_storage::SeaOrmStorage;

/// 单连接的内存 SQLite，迁移已执行
pub async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::from_url("sqlite::memory:", 1, 30)
        .await
        .expect("in-memory storage");
    Arc::new(storage)
}

pub async fn judge(storage: &dyn Storage, username: &str) -> User {
    user(storage, username, UserRole::Judge).await
}

pub async fn user(storage: &dyn Storage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            password: "not-a-real-hash".to_string(),
            role,
        })
        .await
        .expect("create user")
}

pub async fn contest(storage: &dyn Storage, name: &str) -> Contest {
    storage
        .create_contest(CreateContestRequest {
            name: name.to_string(),
            image_url: None,
        })
        .await
        .expect("create contest")
}

pub async fn candidate(storage: &dyn Storage, contest_id: i64, number: i32) -> Candidate {
    candidate_with_status(storage, contest_id, number, ScoringStatus::Open).await
}

pub async fn candidate_with_status(
    storage: &dyn Storage,
    contest_id: i64,
    number: i32,
    status: ScoringStatus,
) -> Candidate {
    storage
        .create_candidate(CreateCandidateRequest {
            contest_id,
            name: format!("Candidate {number}"),
            candidate_number: number,
            image_url: None,
            display_order: None,
            status,
        })
        .await
        .expect("create candidate")
}

pub async fn judge_segment(
    storage: &dyn Storage,
    contest_id: i64,
    name: &str,
    percentage: f64,
) -> Segment {
    segment(storage, contest_id, name, percentage, SegmentType::Judge).await
}

pub async fn admin_segment(
    storage: &dyn Storage,
    contest_id: i64,
    name: &str,
    percentage: f64,
) -> Segment {
    segment(storage, contest_id, name, percentage, SegmentType::Admin).await
}

async fn segment(
    storage: &dyn Storage,
    contest_id: i64,
    name: &str,
    percentage: f64,
    segment_type: SegmentType,
) -> Segment {
    storage
        .create_segment(CreateSegmentRequest {
            contest_id,
            name: name.to_string(),
            percentage,
            segment_type,
            status: ScoringStatus::Open,
        })
        .await
        .expect("create segment")
}

pub async fn criterion(storage: &dyn Storage, segment_id: i64, name: &str, max: f64) -> Criterion {
    storage
        .create_criterion(CreateCriterionRequest {
            segment_id,
            name: name.to_string(),
            max_score: max,
        })
        .await
        .expect("create criterion")
}

/// "Talent" 环节：Skill 60 + Stage Presence 40
pub struct TalentFixture {
    pub contest: Contest,
    pub segment: Segment,
    pub skill: Criterion,
    pub presence: Criterion,
}

pub async fn talent_fixture(storage: &dyn Storage, percentage: f64) -> TalentFixture {
    let contest = contest(storage, "Pageant").await;
    let segment = judge_segment(storage, contest.id, "Talent", percentage).await;
    let skill = criterion(storage, segment.id, "Skill", 60.0).await;
    let presence = criterion(storage, segment.id, "Stage Presence", 40.0).await;
    TalentFixture {
        contest,
        segment,
        skill,
        presence,
    }
}
