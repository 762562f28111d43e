use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::requests::SubmissionListFilter;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    filter: SubmissionListFilter,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_submissions(filter).await {
        Ok(submissions) => Ok(HttpResponse::Ok().json(ApiResponse::success(submissions, "查询成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交列表失败: {e}"),
            )),
        ),
    }
}
