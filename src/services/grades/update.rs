use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::requests::UpdateGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    teacher_id: i64,
    update_request: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    if update_request.points < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationError,
            "分数不能为负数",
        )));
    }

    let storage = service.get_storage(request);

    let grade = match storage.get_grade_by_id(grade_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "评分不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分失败: {e}"),
                )),
            );
        }
    };

    // 对照作业满分校验，作业已被软删除时跳过上限检查
    match storage.get_assignment_by_id(grade.assignment_id).await {
        Ok(Some(assignment)) if update_request.points > assignment.max_points => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationError,
                format!("分数不能超过作业满分 {}", assignment.max_points),
            )));
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    }

    match storage
        .update_grade(
            grade_id,
            teacher_id,
            update_request.points,
            update_request.feedback,
        )
        .await
    {
        Ok(Some(updated)) => match storage.expand_grade(updated).await {
            Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(info, "评分更新成功"))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("评分更新成功但查询失败: {e}"),
                )),
            ),
        },
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "评分不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新评分失败: {e}"),
            )),
        ),
    }
}
