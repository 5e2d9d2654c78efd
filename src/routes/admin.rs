use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::awards::requests::{AssignWinnerRequest, CreateAwardRequest};
use crate::models::candidates::requests::{BatchUpdateCandidatesRequest, UpdateStatusRequest};
use crate::models::scores::requests::{
    JudgingStatusQuery, SaveSpecialScoresRequest, ScoreListQuery, SpecialScoresQuery,
    UnlockCandidateScoresRequest, UnlockScoresRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AdminService;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn get_special_scores(
    req: HttpRequest,
    query: web::Query<SpecialScoresQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .get_special_scores(query.into_inner(), &req)
        .await
}

pub async fn save_special_scores(
    req: HttpRequest,
    body: web::Json<SaveSpecialScoresRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .save_special_scores(body.into_inner(), &req)
        .await
}

pub async fn unlock_scores(
    req: HttpRequest,
    body: web::Json<UnlockScoresRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.unlock_scores(body.into_inner(), &req).await
}

pub async fn unlock_candidate_scores(
    req: HttpRequest,
    body: web::Json<UnlockCandidateScoresRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .unlock_candidate_scores(body.into_inner(), &req)
        .await
}

pub async fn judging_status(
    req: HttpRequest,
    query: web::Query<JudgingStatusQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.judging_status(query.into_inner(), &req).await
}

pub async fn list_scores(
    req: HttpRequest,
    query: web::Query<ScoreListQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_scores(query.into_inner(), &req).await
}

pub async fn kpis(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.kpis(&req).await
}

pub async fn update_candidate_status(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_candidate_status(path.into_inner(), body.into_inner(), &req)
        .await
}

pub async fn update_contest_candidates_status(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_contest_candidates_status(path.into_inner(), body.into_inner(), &req)
        .await
}

pub async fn batch_update_candidates(
    req: HttpRequest,
    body: web::Json<BatchUpdateCandidatesRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .batch_update_candidates(body.into_inner(), &req)
        .await
}

pub async fn update_segment_status(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_segment_status(path.into_inner(), body.into_inner(), &req)
        .await
}

pub async fn list_awards(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_awards(&req).await
}

pub async fn create_award(
    req: HttpRequest,
    body: web::Json<CreateAwardRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.create_award(body.into_inner(), &req).await
}

pub async fn delete_award(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.delete_award(path.into_inner(), &req).await
}

pub async fn assign_award_winner(
    req: HttpRequest,
    body: web::Json<AssignWinnerRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .assign_award_winner(body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/special-scores", web::get().to(get_special_scores))
                    .route("/special-scores", web::post().to(save_special_scores))
                    .route("/unlock-scores", web::delete().to(unlock_scores))
                    .route(
                        "/unlock-scores-for-candidate",
                        web::delete().to(unlock_candidate_scores),
                    )
                    .route(
                        "/judging-status-by-segment",
                        web::get().to(judging_status),
                    )
                    .route("/scores", web::get().to(list_scores))
                    .route("/kpis", web::get().to(kpis))
                    // 固定路径须在 /candidates/{id} 之前注册
                    .route(
                        "/candidates/batch-update",
                        web::put().to(batch_update_candidates),
                    )
                    .route(
                        "/candidates/{id}/status",
                        web::put().to(update_candidate_status),
                    )
                    .route(
                        "/contests/{id}/candidates/status",
                        web::put().to(update_contest_candidates_status),
                    )
                    .route(
                        "/segments/{id}/status",
                        web::put().to(update_segment_status),
                    )
                    .route("/awards", web::get().to(list_awards))
                    .route("/awards", web::post().to(create_award))
                    .route("/awards/{id}", web::delete().to(delete_award))
                    .route("/award-winners", web::post().to(assign_award_winner)),
            ),
    );
}
