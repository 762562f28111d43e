pub mod create;
pub mod detail;
pub mod download;
pub mod list;
pub mod status;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{SubmissionListFilter, UpdateSubmissionStatusRequest};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    // 学生上传提交（multipart）
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        student_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_submission(self, request, student_id, payload).await
    }

    // 提交列表（教师视角或按学生过滤）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        filter: SubmissionListFilter,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_submissions(self, request, filter).await
    }

    // 提交详情，学生只能查看本人提交
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        user: User,
    ) -> ActixResult<HttpResponse> {
        detail::handle_get_submission(self, request, submission_id, user).await
    }

    // 教师批阅：更新提交状态
    pub async fn update_status(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        update_request: UpdateSubmissionStatusRequest,
    ) -> ActixResult<HttpResponse> {
        status::handle_update_status(self, request, submission_id, update_request).await
    }

    // 下载提交文件，学生只能下载本人提交
    pub async fn download_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        user: User,
    ) -> ActixResult<HttpResponse> {
        download::handle_download_submission(self, request, submission_id, user).await
    }
}
