use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::JudgingService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn my_scores(
    service: &JudgingService,
    segment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let judge = match JudgingService::current_judge(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_judge_scores(judge.id, segment_id).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            rows,
            "Scores retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
