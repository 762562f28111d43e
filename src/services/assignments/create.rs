use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::assignments::responses::{AssignmentCreatorInfo, AssignmentInfo};
use crate::models::{ApiResponse, ErrorCode};

pub(super) fn validate_create(request: &CreateAssignmentRequest) -> Result<(), &'static str> {
    if request.title.trim().is_empty() {
        return Err("作业标题不能为空");
    }
    if request.description.trim().is_empty() {
        return Err("作业描述不能为空");
    }
    if request.subject.trim().is_empty() {
        return Err("科目不能为空");
    }
    if request.max_points < 0 {
        return Err("满分不能为负数");
    }
    if let Some(size) = request.max_file_size
        && size <= 0
    {
        return Err("文件大小上限必须为正数");
    }
    Ok(())
}

pub async fn handle_create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    user_id: i64,
    create_request: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_create(&create_request) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationError, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_assignment(user_id, create_request).await {
        Ok(assignment) => {
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
            Ok(HttpResponse::Created().json(ApiResponse::success(info, "作业创建成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建作业失败: {e}"),
            )),
        ),
    }
}
