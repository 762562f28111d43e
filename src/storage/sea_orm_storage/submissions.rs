//! 提交存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{AssignCheckError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{NewSubmission, SubmissionListFilter},
    responses::{SubmissionAssignmentInfo, SubmissionInfo, SubmissionStudentInfo},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// is_late 在落库的这一刻对照作业当前的截止时间计算，
    /// 之后无论截止时间如何修改都不再变化。
    pub async fn create_submission_impl(
        &self,
        student_id: i64,
        new: NewSubmission,
    ) -> Result<Submission> {
        let assignment = self
            .get_assignment_by_id_impl(new.assignment_id)
            .await?
            .ok_or_else(|| {
                AssignCheckError::not_found(format!("作业不存在: {}", new.assignment_id))
            })?;

        let now = chrono::Utc::now();
        let is_late = now > assignment.due_date;

        let model = ActiveModel {
            assignment_id: Set(new.assignment_id),
            student_id: Set(student_id),
            file_name: Set(new.file_name),
            file_path: Set(new.file_path),
            file_size: Set(new.file_size),
            submitted_at: Set(now.timestamp()),
            status: Set(SubmissionStatus::Submitted.to_string()),
            comments: Set(new.comments),
            teacher_comments: Set(None),
            is_late: Set(is_late),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生对某作业的最近一次提交
    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出提交（含作业与学生展开信息）
    pub async fn list_submissions_impl(
        &self,
        filter: SubmissionListFilter,
    ) -> Result<Vec<SubmissionInfo>> {
        let mut select = Submissions::find();

        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if filter.late_only {
            select = select.filter(Column::IsLate.eq(true));
        }

        let submissions: Vec<Submission> = select
            .order_by_desc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询提交列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_submission())
            .collect();

        self.expand_submissions(submissions).await
    }

    /// 教师批阅：覆盖状态与批语
    ///
    /// 不保留历史，每次转换直接丢弃之前的状态。
    pub async fn update_submission_review_impl(
        &self,
        id: i64,
        status: SubmissionStatus,
        teacher_comments: Option<String>,
    ) -> Result<Option<Submission>> {
        let existing = self.get_submission_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(comments) = teacher_comments {
            model.teacher_comments = Set(Some(comments));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("更新提交状态失败: {e}")))?;

        self.get_submission_by_id_impl(id).await
    }

    /// 展开单条提交
    pub async fn expand_submission_impl(&self, submission: Submission) -> Result<SubmissionInfo> {
        let mut expanded = self.expand_submissions(vec![submission]).await?;
        expanded.pop().ok_or_else(|| {
            AssignCheckError::database_operation("提交展开结果为空".to_string())
        })
    }

    /// 批量展开提交的作业与学生信息
    ///
    /// 展开使用原始作业行而不过滤 is_active，已存在的提交在作业
    /// 软删除后仍要能展示其作业信息。
    async fn expand_submissions(
        &self,
        submissions: Vec<Submission>,
    ) -> Result<Vec<SubmissionInfo>> {
        if submissions.is_empty() {
            return Ok(vec![]);
        }

        let assignment_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.assignment_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        let student_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.student_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let assignments = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询作业信息失败: {e}")))?;
        let assignment_map: HashMap<i64, SubmissionAssignmentInfo> = assignments
            .into_iter()
            .map(|m| {
                let a = m.into_assignment();
                (
                    a.id,
                    SubmissionAssignmentInfo {
                        id: a.id,
                        title: a.title,
                        subject: a.subject,
                        max_points: a.max_points,
                        due_date: a.due_date,
                    },
                )
            })
            .collect();

        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询学生信息失败: {e}")))?;
        let student_map: HashMap<i64, SubmissionStudentInfo> = users
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    SubmissionStudentInfo {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                        student_number: u.student_number,
                    },
                )
            })
            .collect();

        Ok(submissions
            .into_iter()
            .map(|s| {
                let assignment = assignment_map.get(&s.assignment_id).cloned();
                let student = student_map.get(&s.student_id).cloned();
                SubmissionInfo::from_submission(s, assignment, student)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        memory_storage, seed_assignment, seed_submission, seed_user,
    };
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::{NewSubmission, SubmissionListFilter};
    use crate::models::users::entities::UserRole;
    use chrono::Duration;

    #[tokio::test]
    async fn test_is_late_fixed_at_creation() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;

        // 截止时间已过一天，提交必然迟交
        let assignment = seed_assignment(&storage, teacher, Duration::days(-1)).await;
        let submission = seed_submission(&storage, student, assignment.id).await;
        assert!(submission.is_late);
        assert_eq!(submission.status, SubmissionStatus::Submitted);

        // 事后把截止时间推到未来，已有提交的 is_late 不变
        storage
            .update_assignment_impl(
                assignment.id,
                UpdateAssignmentRequest {
                    title: None,
                    description: None,
                    subject: None,
                    max_points: None,
                    due_date: Some(chrono::Utc::now() + Duration::days(30)),
                    instructions: None,
                    allowed_file_types: None,
                    max_file_size: None,
                },
            )
            .await
            .unwrap();

        let reloaded = storage
            .get_submission_by_id_impl(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_late);
    }

    #[tokio::test]
    async fn test_create_requires_existing_assignment() {
        let storage = memory_storage().await;
        let student = seed_user(&storage, "student", UserRole::Student).await;

        let result = storage
            .create_submission_impl(
                student,
                NewSubmission {
                    assignment_id: 404,
                    file_name: "report.pdf".to_string(),
                    file_path: "uploads/x.bin".to_string(),
                    file_size: 1,
                    comments: None,
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let alice = seed_user(&storage, "alice", UserRole::Student).await;
        let bob = seed_user(&storage, "bob", UserRole::Student).await;

        let late_assignment = seed_assignment(&storage, teacher, Duration::days(-1)).await;
        let open_assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;

        seed_submission(&storage, alice, late_assignment.id).await;
        seed_submission(&storage, alice, open_assignment.id).await;
        seed_submission(&storage, bob, open_assignment.id).await;

        let all = storage
            .list_submissions_impl(SubmissionListFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        // 展开信息齐全
        assert!(all.iter().all(|s| s.assignment.is_some() && s.student.is_some()));

        let late = storage
            .list_submissions_impl(SubmissionListFilter {
                late_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(late.len(), 1);
        assert!(late[0].is_late);

        let mine = storage
            .list_submissions_impl(SubmissionListFilter {
                student_id: Some(bob),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].student_id, bob);
    }

    #[tokio::test]
    async fn test_review_overwrites_without_history() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;
        let submission = seed_submission(&storage, student, assignment.id).await;

        let reviewed = storage
            .update_submission_review_impl(
                submission.id,
                SubmissionStatus::UnderReview,
                Some("格式有问题".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.status, SubmissionStatus::UnderReview);
        assert_eq!(reviewed.teacher_comments.as_deref(), Some("格式有问题"));

        // 任意状态可达任意状态
        let rejected = storage
            .update_submission_review_impl(submission.id, SubmissionStatus::Rejected, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rejected.status, SubmissionStatus::Rejected);
        // 未提供批语时保留原值
        assert_eq!(rejected.teacher_comments.as_deref(), Some("格式有问题"));

        assert!(
            storage
                .update_submission_review_impl(9999, SubmissionStatus::Accepted, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
