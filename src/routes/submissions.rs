use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::submissions::requests::{SubmissionListFilter, UpdateSubmissionStatusRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 上传提交 - 仅学生
pub async fn create_submission(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .create_submission(&req, user_id, payload)
        .await
}

// 提交列表 - 仅教师
pub async fn list_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, SubmissionListFilter::default())
        .await
}

// 迟交列表 - 仅教师
pub async fn list_late_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(
            &req,
            SubmissionListFilter {
                late_only: true,
                ..Default::default()
            },
        )
        .await
}

// 本人提交列表 - 仅学生
pub async fn list_my_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .list_submissions(
            &req,
            SubmissionListFilter {
                student_id: Some(user_id),
                ..Default::default()
            },
        )
        .await
}

// 提交详情 - 权限在业务层检查（学生仅本人）
pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user_claims(&req) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .get_submission(&req, path.into_inner(), user)
        .await
}

// 批阅提交 - 仅教师
pub async fn update_submission_status(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateSubmissionStatusRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_status(&req, path.into_inner(), body.into_inner())
        .await
}

// 下载提交文件 - 权限在业务层检查（学生仅本人）
pub async fn download_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_user_claims(&req) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBMISSION_SERVICE
        .download_submission(&req, path.into_inner(), user)
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    )
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/late")
                    .route(web::get().to(list_late_submissions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 具体路径需注册在 /{id} 之前
            .service(
                web::resource("/my-submissions")
                    .route(web::get().to(list_my_submissions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}")
                    // 权限在业务层检查（学生仅本人，教师任意）
                    .route(web::get().to(get_submission)),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::put().to(update_submission_status))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/download")
                    // 权限在业务层检查（学生仅本人，教师任意）
                    .route(web::get().to(download_submission)),
            ),
    );
}
