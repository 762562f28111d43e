use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::responses::{AssignmentCreatorInfo, AssignmentInfo};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => {
            let creator = storage
                .get_user_by_id(assignment.created_by)
                .await
                .ok()
                .flatten()
                .map(|u| AssignmentCreatorInfo {
                    id: u.id,
                    name: u.name,
                    email: u.email,
                });
            let info = AssignmentInfo::from_assignment(assignment, creator);
            Ok(HttpResponse::Ok().json(ApiResponse::success(info, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询作业失败: {e}"),
            )),
        ),
    }
}
