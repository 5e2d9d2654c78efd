use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ResultsService;

static RESULTS_SERVICE: Lazy<ResultsService> = Lazy::new(ResultsService::new_lazy);

pub async fn get_results(req: HttpRequest) -> ActixResult<HttpResponse> {
    RESULTS_SERVICE.get_results(&req).await
}

pub async fn get_winners(req: HttpRequest) -> ActixResult<HttpResponse> {
    RESULTS_SERVICE.get_winners(&req).await
}

// 公开接口，无需认证
pub fn configure_results_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/results", web::get().to(get_results))
        .route("/api/v1/results/winners", web::get().to(get_winners));
}
