use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_list_grades(
    service: &GradeService,
    request: &HttpRequest,
    student_id: Option<i64>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_grades(student_id).await {
        Ok(grades) => Ok(HttpResponse::Ok().json(ApiResponse::success(grades, "查询成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询评分列表失败: {e}"),
            )),
        ),
    }
}
