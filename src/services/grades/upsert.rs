use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::requests::CreateGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 分数上限在落库之前校验，校验失败时提交状态保持不变
pub async fn handle_upsert_grade(
    service: &GradeService,
    request: &HttpRequest,
    teacher_id: i64,
    grade_request: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    if grade_request.points < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationError,
            "分数不能为负数",
        )));
    }

    let storage = service.get_storage(request);

    let submission = match storage
        .get_submission_by_id(grade_request.submission_id)
        .await
    {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    // 对照作业满分校验，作业已被软删除时跳过上限检查
    match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(Some(assignment)) if grade_request.points > assignment.max_points => {
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
        .upsert_grade(
            teacher_id,
            grade_request.submission_id,
            grade_request.points,
            grade_request.feedback,
        )
        .await
    {
        Ok(grade) => match storage.expand_grade(grade).await {
            Ok(info) => Ok(HttpResponse::Created().json(ApiResponse::success(info, "评分成功"))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("评分成功但查询失败: {e}"),
                )),
            ),
        },
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("评分失败: {e}"),
            )),
        ),
    }
}
