use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::ApiResponse;
use crate::models::scores::requests::ScoreListQuery;
use crate::services::error_response;

pub async fn list_scores(
    service: &AdminService,
    query: ScoreListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_scores(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Scores retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
