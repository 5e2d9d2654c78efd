//! 奖项管理：奖项本身不参与计分，只记录每个奖项的获奖者

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AdminService;
use crate::errors::{Result, TabulationError};
use crate::models::awards::{
    entities::NewAwardWinner,
    requests::{AssignWinnerRequest, CreateAwardRequest},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

/// 校验获奖指定：奖项与选手都必须存在
pub async fn prepare_award_winner(
    storage: &dyn Storage,
    body: &AssignWinnerRequest,
) -> Result<NewAwardWinner> {
    storage
        .get_award_by_id(body.award_id)
        .await?
        .ok_or_else(|| TabulationError::not_found(format!("Award {} not found", body.award_id)))?;
    let candidate = storage
        .get_candidate_by_id(body.candidate_id)
        .await?
        .ok_or_else(|| {
            TabulationError::not_found(format!("Candidate {} not found", body.candidate_id))
        })?;

    Ok(NewAwardWinner {
        award_id: body.award_id,
        candidate_id: candidate.id,
    })
}

pub async fn list_awards(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_awards().await {
        Ok(awards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            awards,
            "Awards retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn create_award(
    service: &AdminService,
    body: CreateAwardRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(award) = body.normalized() else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Award name and type are required",
        )));
    };

    let storage = service.get_storage(request);
    match storage.create_award(award).await {
        Ok(award) => {
            info!("Award '{}' created ({})", award.name, award.award_type);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                award,
                "Award created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_award(
    service: &AdminService,
    award_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_award(award_id).await {
        Ok(true) => {
            info!("Award {} deleted", award_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Award deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AwardNotFound,
            "Award not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn assign_winner(
    service: &AdminService,
    body: AssignWinnerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let winner = match prepare_award_winner(storage.as_ref(), &body).await {
        Ok(winner) => winner,
        Err(e) => {
            warn!("Award winner rejected: {}", e);
            return Ok(error_response(&e));
        }
    };

    match storage.assign_award_winner(winner).await {
        Ok(()) => {
            info!(
                "Award {} assigned to candidate {}",
                winner.award_id, winner.candidate_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::<()>::success_empty(
                "Winner assigned successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
