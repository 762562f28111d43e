use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::UpdateSubmissionStatusRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 教师批阅：状态之间不设转移表，任意状态可直接覆盖
pub async fn handle_update_status(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    update_request: UpdateSubmissionStatusRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .update_submission_review(
            submission_id,
            update_request.status,
            update_request.teacher_comments,
        )
        .await
    {
        Ok(Some(submission)) => match storage.expand_submission(submission).await {
            Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(info, "状态更新成功"))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("状态更新成功但查询失败: {e}"),
                )),
            ),
        },
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新提交状态失败: {e}"),
            )),
        ),
    }
}
