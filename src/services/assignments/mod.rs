pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod student_view;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 创建作业（教师）
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        user_id: i64,
        create_request: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_assignment(self, request, user_id, create_request).await
    }

    // 作业列表
    pub async fn list_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_assignments(self, request).await
    }

    // 学生视角的作业状态列表
    pub async fn list_student_view(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        student_view::handle_list_student_view(self, request, student_id).await
    }

    // 作业详情
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::handle_get_assignment(self, request, assignment_id).await
    }

    // 更新作业（仅创建者）
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        user_id: i64,
        update_request: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_assignment(self, request, assignment_id, user_id, update_request)
            .await
    }

    // 删除作业（软删除，仅创建者）
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete_assignment(self, request, assignment_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, seed_assignment, seed_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn update_title(title: &str) -> UpdateAssignmentRequest {
        UpdateAssignmentRequest {
            title: Some(title.to_string()),
            description: None,
            subject: None,
            max_points: None,
            due_date: None,
            instructions: None,
            allowed_file_types: None,
            max_file_size: None,
        }
    }

    #[tokio::test]
    async fn test_non_creator_update_forbidden() {
        let raw = memory_storage().await;
        let creator = seed_user(&raw, "creator", UserRole::Teacher).await;
        let other = seed_user(&raw, "other", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, creator, chrono::Duration::days(7)).await;

        let storage: Arc<dyn Storage> = Arc::new(raw);
        let service = AssignmentService {
            storage: Some(storage.clone()),
        };
        let req = TestRequest::default().to_http_request();

        // 非创建者修改 -> 403 且无变更
        let resp = service
            .update_assignment(&req, assignment.id, other, update_title("改名"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let reloaded = storage
            .get_assignment_by_id(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.title, assignment.title);

        // 创建者本人修改 -> 成功
        let resp = service
            .update_assignment(&req, assignment.id, creator, update_title("改名"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let reloaded = storage
            .get_assignment_by_id(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.title, "改名");
    }

    #[tokio::test]
    async fn test_non_creator_delete_forbidden() {
        let raw = memory_storage().await;
        let creator = seed_user(&raw, "creator", UserRole::Teacher).await;
        let other = seed_user(&raw, "other", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, creator, chrono::Duration::days(7)).await;

        let storage: Arc<dyn Storage> = Arc::new(raw);
        let service = AssignmentService {
            storage: Some(storage.clone()),
        };
        let req = TestRequest::default().to_http_request();

        let resp = service
            .delete_assignment(&req, assignment.id, other)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(
            storage
                .get_assignment_by_id(assignment.id)
                .await
                .unwrap()
                .is_some()
        );

        let resp = service
            .delete_assignment(&req, assignment.id, creator)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            storage
                .get_assignment_by_id(assignment.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
