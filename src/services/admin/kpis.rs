use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn get_kpis(service: &AdminService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    match service.get_broadcaster(request).kpi_digest().await {
        Ok(digest) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            digest,
            "KPI digest retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
