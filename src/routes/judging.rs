use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::scores::requests::{SubmitCandidateScoresRequest, SubmitSegmentScoresRequest};
use crate::models::users::entities::UserRole;
use crate::services::JudgingService;

// 懒加载的全局 JudgingService 实例
static JUDGING_SERVICE: Lazy<JudgingService> = Lazy::new(JudgingService::new_lazy);

pub async fn list_contests(req: HttpRequest) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE.list_contests(&req).await
}

pub async fn list_segments(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE.list_segments(path.into_inner(), &req).await
}

pub async fn list_criteria(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE.list_criteria(path.into_inner(), &req).await
}

pub async fn list_candidates(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE.list_candidates(path.into_inner(), &req).await
}

pub async fn locked_candidates(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE
        .locked_candidates(path.into_inner(), &req)
        .await
}

pub async fn my_scores(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE.my_scores(path.into_inner(), &req).await
}

pub async fn submit_segment_scores(
    req: HttpRequest,
    body: web::Json<SubmitSegmentScoresRequest>,
) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE
        .submit_segment_scores(body.into_inner(), &req)
        .await
}

pub async fn submit_candidate_scores(
    req: HttpRequest,
    body: web::Json<SubmitCandidateScoresRequest>,
) -> ActixResult<HttpResponse> {
    JUDGING_SERVICE
        .submit_candidate_scores(body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_judging_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/judging")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::judge_roles()))
                    .route("/contests", web::get().to(list_contests))
                    .route("/contests/{id}/segments", web::get().to(list_segments))
                    .route("/segments/{id}/criteria", web::get().to(list_criteria))
                    .route("/segments/{id}/candidates", web::get().to(list_candidates))
                    .route(
                        "/segments/{id}/locked-candidates",
                        web::get().to(locked_candidates),
                    )
                    .route("/segments/{id}/my-scores", web::get().to(my_scores))
                    .service(
                        web::resource("/scores")
                            .wrap(middlewares::RateLimit::score_submission())
                            .route(web::post().to(submit_segment_scores)),
                    )
                    .service(
                        web::resource("/scores/candidate")
                            .wrap(middlewares::RateLimit::score_submission())
                            .route(web::post().to(submit_candidate_scores)),
                    ),
            ),
    );
}
