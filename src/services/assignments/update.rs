use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::models::assignments::responses::{AssignmentCreatorInfo, AssignmentInfo};
use crate::models::{ApiResponse, ErrorCode};

fn validate_update(request: &UpdateAssignmentRequest) -> Result<(), &'static str> {
    if let Some(title) = &request.title
        && title.trim().is_empty()
    {
        return Err("作业标题不能为空");
    }
    if let Some(description) = &request.description
        && description.trim().is_empty()
    {
        return Err("作业描述不能为空");
    }
    if let Some(subject) = &request.subject
        && subject.trim().is_empty()
    {
        return Err("科目不能为空");
    }
    if let Some(points) = request.max_points
        && points < 0
    {
        return Err("满分不能为负数");
    }
    if let Some(size) = request.max_file_size
        && size <= 0
    {
        return Err("文件大小上限必须为正数");
    }
    Ok(())
}

pub async fn handle_update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    user_id: i64,
    update_request: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_update(&update_request) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationError, msg)));
    }

    let storage = service.get_storage(request);

    // 仅创建者可修改
    let existing = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    if existing.created_by != user_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只有作业创建者可以修改该作业",
        )));
    }

    match storage
        .update_assignment(assignment_id, update_request)
        .await
    {
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
            Ok(HttpResponse::Ok().json(ApiResponse::success(info, "作业更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新作业失败: {e}"),
            )),
        ),
    }
}
