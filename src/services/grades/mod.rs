pub mod list;
pub mod update;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{CreateGradeRequest, UpdateGradeRequest};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    // 创建或覆盖评分（教师）
    pub async fn upsert_grade(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        grade_request: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::handle_upsert_grade(self, request, teacher_id, grade_request).await
    }

    // 评分列表（教师视角或按学生过滤）
    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        student_id: Option<i64>,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_grades(self, request, student_id).await
    }

    // 修正已有评分（教师）
    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        teacher_id: i64,
        update_request: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_grade(self, request, grade_id, teacher_id, update_request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AssignCheckError;
    use crate::models::assignments::entities::Assignment;
    use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
    use crate::models::assignments::responses::StudentAssignmentView;
    use crate::models::grades::entities::Grade;
    use crate::models::grades::responses::GradeInfo;
    use crate::models::submissions::entities::{Submission, SubmissionStatus};
    use crate::models::submissions::requests::{NewSubmission, SubmissionListFilter};
    use crate::models::submissions::responses::SubmissionInfo;
    use crate::models::users::entities::{User, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, seed_assignment, seed_submission, seed_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    // 作业查询总是失败、其余操作透传的存储包装
    struct BrokenAssignmentLookup(Arc<dyn Storage>);

    #[async_trait::async_trait]
    impl Storage for BrokenAssignmentLookup {
        async fn get_assignment_by_id(
            &self,
            _id: i64,
        ) -> crate::errors::Result<Option<Assignment>> {
            Err(AssignCheckError::database_operation("作业查询不可用"))
        }

        async fn create_user(&self, user: CreateUserRequest) -> crate::errors::Result<User> {
            self.0.create_user(user).await
        }
        async fn get_user_by_id(&self, id: i64) -> crate::errors::Result<Option<User>> {
            self.0.get_user_by_id(id).await
        }
        async fn get_user_by_email(&self, email: &str) -> crate::errors::Result<Option<User>> {
            self.0.get_user_by_email(email).await
        }
        async fn update_last_login(&self, id: i64) -> crate::errors::Result<bool> {
            self.0.update_last_login(id).await
        }
        async fn count_users(&self) -> crate::errors::Result<u64> {
            self.0.count_users().await
        }
        async fn create_assignment(
            &self,
            created_by: i64,
            req: CreateAssignmentRequest,
        ) -> crate::errors::Result<Assignment> {
            self.0.create_assignment(created_by, req).await
        }
        async fn list_assignments(&self) -> crate::errors::Result<Vec<Assignment>> {
            self.0.list_assignments().await
        }
        async fn list_student_assignment_views(
            &self,
            student_id: i64,
        ) -> crate::errors::Result<Vec<StudentAssignmentView>> {
            self.0.list_student_assignment_views(student_id).await
        }
        async fn update_assignment(
            &self,
            id: i64,
            update: UpdateAssignmentRequest,
        ) -> crate::errors::Result<Option<Assignment>> {
            self.0.update_assignment(id, update).await
        }
        async fn soft_delete_assignment(&self, id: i64) -> crate::errors::Result<bool> {
            self.0.soft_delete_assignment(id).await
        }
        async fn create_submission(
            &self,
            student_id: i64,
            new: NewSubmission,
        ) -> crate::errors::Result<Submission> {
            self.0.create_submission(student_id, new).await
        }
        async fn get_submission_by_id(
            &self,
            id: i64,
        ) -> crate::errors::Result<Option<Submission>> {
            self.0.get_submission_by_id(id).await
        }
        async fn get_submission_by_assignment_and_student(
            &self,
            assignment_id: i64,
            student_id: i64,
        ) -> crate::errors::Result<Option<Submission>> {
            self.0
                .get_submission_by_assignment_and_student(assignment_id, student_id)
                .await
        }
        async fn list_submissions(
            &self,
            filter: SubmissionListFilter,
        ) -> crate::errors::Result<Vec<SubmissionInfo>> {
            self.0.list_submissions(filter).await
        }
        async fn update_submission_review(
            &self,
            id: i64,
            status: SubmissionStatus,
            teacher_comments: Option<String>,
        ) -> crate::errors::Result<Option<Submission>> {
            self.0
                .update_submission_review(id, status, teacher_comments)
                .await
        }
        async fn expand_submission(
            &self,
            submission: Submission,
        ) -> crate::errors::Result<SubmissionInfo> {
            self.0.expand_submission(submission).await
        }
        async fn upsert_grade(
            &self,
            teacher_id: i64,
            submission_id: i64,
            points: i32,
            feedback: Option<String>,
        ) -> crate::errors::Result<Grade> {
            self.0
                .upsert_grade(teacher_id, submission_id, points, feedback)
                .await
        }
        async fn get_grade_by_id(&self, id: i64) -> crate::errors::Result<Option<Grade>> {
            self.0.get_grade_by_id(id).await
        }
        async fn get_grade_by_submission_id(
            &self,
            submission_id: i64,
        ) -> crate::errors::Result<Option<Grade>> {
            self.0.get_grade_by_submission_id(submission_id).await
        }
        async fn list_grades(
            &self,
            student_id: Option<i64>,
        ) -> crate::errors::Result<Vec<GradeInfo>> {
            self.0.list_grades(student_id).await
        }
        async fn update_grade(
            &self,
            id: i64,
            teacher_id: i64,
            points: i32,
            feedback: Option<String>,
        ) -> crate::errors::Result<Option<Grade>> {
            self.0.update_grade(id, teacher_id, points, feedback).await
        }
        async fn expand_grade(&self, grade: Grade) -> crate::errors::Result<GradeInfo> {
            self.0.expand_grade(grade).await
        }
    }

    #[tokio::test]
    async fn test_points_over_cap_rejected_and_status_untouched() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        // seed_assignment 的满分为 100
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let submission = seed_submission(&raw, student, assignment.id).await;

        let storage: Arc<dyn Storage> = Arc::new(raw);
        let service = GradeService {
            storage: Some(storage.clone()),
        };
        let req = TestRequest::default().to_http_request();

        // 超过满分 -> 400，提交状态保持不变
        let resp = service
            .upsert_grade(
                &req,
                teacher,
                CreateGradeRequest {
                    submission_id: submission.id,
                    points: 150,
                    feedback: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let reloaded = storage
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SubmissionStatus::Submitted);

        // 满分以内 -> 201，提交状态变为 graded
        let resp = service
            .upsert_grade(
                &req,
                teacher,
                CreateGradeRequest {
                    submission_id: submission.id,
                    points: 90,
                    feedback: Some("做得不错".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let reloaded = storage
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SubmissionStatus::Graded);
    }

    #[tokio::test]
    async fn test_upsert_missing_submission_not_found() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;

        let storage: Arc<dyn Storage> = Arc::new(raw);
        let service = GradeService {
            storage: Some(storage),
        };
        let req = TestRequest::default().to_http_request();

        let resp = service
            .upsert_grade(
                &req,
                teacher,
                CreateGradeRequest {
                    submission_id: 9999,
                    points: 60,
                    feedback: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assignment_lookup_failure_blocks_grading() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let submission = seed_submission(&raw, student, assignment.id).await;

        let inner: Arc<dyn Storage> = Arc::new(raw);
        let storage: Arc<dyn Storage> = Arc::new(BrokenAssignmentLookup(inner.clone()));
        let service = GradeService {
            storage: Some(storage),
        };
        let req = TestRequest::default().to_http_request();

        // 查询作业失败时不得绕过满分校验直接落库
        let resp = service
            .upsert_grade(
                &req,
                teacher,
                CreateGradeRequest {
                    submission_id: submission.id,
                    points: 150,
                    feedback: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            inner
                .get_grade_by_submission_id(submission.id)
                .await
                .unwrap()
                .is_none()
        );
        let reloaded = inner
            .get_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_assignment_lookup_failure_blocks_grade_update() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let submission = seed_submission(&raw, student, assignment.id).await;
        let grade = raw
            .upsert_grade_impl(teacher, submission.id, 80, None)
            .await
            .unwrap();

        let inner: Arc<dyn Storage> = Arc::new(raw);
        let storage: Arc<dyn Storage> = Arc::new(BrokenAssignmentLookup(inner.clone()));
        let service = GradeService {
            storage: Some(storage),
        };
        let req = TestRequest::default().to_http_request();

        let resp = service
            .update_grade(
                &req,
                grade.id,
                teacher,
                UpdateGradeRequest {
                    points: 150,
                    feedback: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let reloaded = inner.get_grade_by_id(grade.id).await.unwrap().unwrap();
        assert_eq!(reloaded.points, 80);
    }
}
