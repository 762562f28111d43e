use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AssignmentService;
use crate::models::assignments::responses::{AssignmentCreatorInfo, AssignmentInfo};
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assignments = match storage.list_assignments().await {
        Ok(list) => list,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业列表失败: {e}"),
                )),
            );
        }
    };

    // 逐个去重拉取创建者信息
    let mut creators: HashMap<i64, AssignmentCreatorInfo> = HashMap::new();
    for assignment in &assignments {
        if creators.contains_key(&assignment.created_by) {
            continue;
        }
        if let Ok(Some(user)) = storage.get_user_by_id(assignment.created_by).await {
            creators.insert(
                user.id,
                AssignmentCreatorInfo {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                },
            );
        }
    }

    let infos: Vec<AssignmentInfo> = assignments
        .into_iter()
        .map(|a| {
            let creator = creators.get(&a.created_by).cloned();
            AssignmentInfo::from_assignment(a, creator)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(infos, "查询成功")))
}
