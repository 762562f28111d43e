use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 创建或覆盖评分 - 仅教师
pub async fn upsert_grade(
    req: HttpRequest,
    body: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    GRADE_SERVICE
        .upsert_grade(&req, user_id, body.into_inner())
        .await
}

// 评分列表 - 仅教师
pub async fn list_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, None).await
}

// 本人成绩列表 - 仅学生
pub async fn list_my_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    GRADE_SERVICE.list_grades(&req, Some(user_id)).await
}

// 修正评分 - 仅教师
pub async fn update_grade(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    GRADE_SERVICE
        .update_grade(&req, path.into_inner(), user_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::post().to(upsert_grade))
                    .route(web::get().to(list_grades))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 具体路径需注册在 /{id} 之前
            .service(
                web::resource("/my-grades")
                    .route(web::get().to(list_my_grades))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_grade))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
