//! 作业存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{AssignCheckError, Result};
use crate::models::assignments::{
    entities::{AllowedFileType, Assignment},
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::{StudentAssignmentView, StudentSubmissionBrief},
};
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

// 作业未显式指定时的文件大小上限：10 MiB
const DEFAULT_MAX_FILE_SIZE: i64 = 10 * 1024 * 1024;

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let allowed = req.allowed_file_types.unwrap_or_else(AllowedFileType::all);
        let allowed_json = serde_json::to_string(&allowed)
            .map_err(|e| AssignCheckError::serialization(format!("序列化文件类型失败: {e}")))?;

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            subject: Set(req.subject),
            max_points: Set(req.max_points),
            due_date: Set(req.due_date.timestamp()),
            created_by: Set(created_by),
            instructions: Set(req.instructions),
            allowed_file_types: Set(allowed_json),
            max_file_size: Set(req.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    ///
    /// 软删除的作业在这里直接被过滤掉，所有读路径（详情、提交时的
    /// 存在性检查、更新与删除）因此统一把它视为不存在。
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出有效作业，创建时间倒序
    pub async fn list_assignments_impl(&self) -> Result<Vec<Assignment>> {
        let results = Assignments::find()
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 学生视角的作业列表
    ///
    /// 对每个有效作业关联该学生的最近一次提交；
    /// is_overdue 仅在尚未提交且已过截止时间时为 true。
    pub async fn list_student_assignment_views_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAssignmentView>> {
        let assignments: Vec<Assignment> = Assignments::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询作业列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_assignment())
            .collect();

        if assignments.is_empty() {
            return Ok(vec![]);
        }

        // 批量取该学生的提交，按提交时间倒序后每个作业保留最新一条
        let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .order_by_desc(SubmissionColumn::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询学生提交失败: {e}")))?;

        let mut latest_by_assignment: HashMap<i64, StudentSubmissionBrief> = HashMap::new();
        for sub in submissions {
            let sub = sub.into_submission();
            latest_by_assignment
                .entry(sub.assignment_id)
                .or_insert(StudentSubmissionBrief {
                    id: sub.id,
                    status: sub.status,
                    submitted_at: sub.submitted_at,
                    is_late: sub.is_late,
                });
        }

        let now = chrono::Utc::now();
        let views = assignments
            .into_iter()
            .map(|assignment| {
                let submission = latest_by_assignment.remove(&assignment.id);
                let submission_status = submission
                    .as_ref()
                    .map(|s| s.status.to_string())
                    .unwrap_or_else(|| "not_submitted".to_string());
                let is_overdue = submission.is_none() && now > assignment.due_date;

                StudentAssignmentView {
                    id: assignment.id,
                    title: assignment.title,
                    description: assignment.description,
                    subject: assignment.subject,
                    max_points: assignment.max_points,
                    due_date: assignment.due_date,
                    instructions: assignment.instructions,
                    allowed_file_types: assignment.allowed_file_types,
                    max_file_size: assignment.max_file_size,
                    submission,
                    submission_status,
                    is_overdue,
                    created_at: assignment.created_at,
                }
            })
            .collect();

        Ok(views)
    }

    /// 部分更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        // 软删除的作业视为不存在
        let existing = self.get_assignment_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(subject) = update.subject {
            model.subject = Set(subject);
        }

        if let Some(max_points) = update.max_points {
            model.max_points = Set(max_points);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(due_date.timestamp());
        }

        if let Some(instructions) = update.instructions {
            model.instructions = Set(Some(instructions));
        }

        if let Some(allowed) = update.allowed_file_types {
            let allowed_json = serde_json::to_string(&allowed)
                .map_err(|e| AssignCheckError::serialization(format!("序列化文件类型失败: {e}")))?;
            model.allowed_file_types = Set(allowed_json);
        }

        if let Some(max_file_size) = update.max_file_size {
            model.max_file_size = Set(max_file_size);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 软删除作业
    pub async fn soft_delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_assignment, seed_user};
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::submissions::requests::NewSubmission;
    use crate::models::users::entities::UserRole;
    use chrono::Duration;

    #[tokio::test]
    async fn test_soft_deleted_assignment_hidden_everywhere() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;

        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;
        assert!(storage.soft_delete_assignment_impl(assignment.id).await.unwrap());

        // 详情、列表、学生视图全部不可见
        assert!(
            storage
                .get_assignment_by_id_impl(assignment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(storage.list_assignments_impl().await.unwrap().is_empty());
        assert!(
            storage
                .list_student_assignment_views_impl(student)
                .await
                .unwrap()
                .is_empty()
        );

        // 重复删除不再生效
        assert!(!storage.soft_delete_assignment_impl(assignment.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_student_view_overdue_and_status() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;

        // 一个已截止、未提交的作业和一个已提交的作业
        let overdue = seed_assignment(&storage, teacher, Duration::days(-1)).await;
        let submitted = seed_assignment(&storage, teacher, Duration::days(7)).await;

        storage
            .create_submission_impl(
                student,
                NewSubmission {
                    assignment_id: submitted.id,
                    file_name: "report.pdf".to_string(),
                    file_path: "uploads/x.bin".to_string(),
                    file_size: 128,
                    comments: None,
                },
            )
            .await
            .unwrap();

        let views = storage
            .list_student_assignment_views_impl(student)
            .await
            .unwrap();
        assert_eq!(views.len(), 2);

        let overdue_view = views.iter().find(|v| v.id == overdue.id).unwrap();
        assert_eq!(overdue_view.submission_status, "not_submitted");
        assert!(overdue_view.is_overdue);

        let submitted_view = views.iter().find(|v| v.id == submitted.id).unwrap();
        assert_eq!(submitted_view.submission_status, "submitted");
        assert!(!submitted_view.is_overdue);
        assert!(submitted_view.submission.is_some());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;

        let updated = storage
            .update_assignment_impl(
                assignment.id,
                UpdateAssignmentRequest {
                    title: Some("第二次实验报告".to_string()),
                    description: None,
                    subject: None,
                    max_points: Some(50),
                    due_date: None,
                    instructions: None,
                    allowed_file_types: None,
                    max_file_size: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "第二次实验报告");
        assert_eq!(updated.max_points, 50);
        // 未提供的字段保持原值
        assert_eq!(updated.subject, assignment.subject);
        assert_eq!(updated.due_date, assignment.due_date);
    }
}
