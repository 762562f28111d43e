//! 评分存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{AssignCheckError, Result};
use crate::models::grades::{
    entities::Grade,
    responses::{GradeAssignmentInfo, GradeInfo, GradeStudentInfo, GradeSubmissionInfo},
};
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建或覆盖评分
    ///
    /// 每条提交最多一条评分，重复评分在原记录上覆盖。
    /// assignment_id / student_id 冗余字段以提交为准每次重新拷贝，
    /// 落库成功后提交状态强制写为 graded。
    pub async fn upsert_grade_impl(
        &self,
        teacher_id: i64,
        submission_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Grade> {
        let submission = self
            .get_submission_by_id_impl(submission_id)
            .await?
            .ok_or_else(|| {
                AssignCheckError::not_found(format!("提交不存在: {submission_id}"))
            })?;

        let now = chrono::Utc::now().timestamp();

        let existing = self.get_grade_by_submission_id_impl(submission_id).await?;

        let saved = match existing {
            Some(grade) => {
                let model = ActiveModel {
                    id: Set(grade.id),
                    assignment_id: Set(submission.assignment_id),
                    student_id: Set(submission.student_id),
                    teacher_id: Set(teacher_id),
                    points: Set(points),
                    feedback: Set(feedback),
                    graded_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| AssignCheckError::database_operation(format!("更新评分失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    submission_id: Set(submission_id),
                    assignment_id: Set(submission.assignment_id),
                    student_id: Set(submission.student_id),
                    teacher_id: Set(teacher_id),
                    points: Set(points),
                    feedback: Set(feedback),
                    graded_at: Set(now),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| AssignCheckError::database_operation(format!("创建评分失败: {e}")))?
            }
        };

        self.update_submission_review_impl(submission_id, SubmissionStatus::Graded, None)
            .await?;

        Ok(saved.into_grade())
    }

    /// 通过 ID 获取评分
    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 列出评分（含作业、学生、提交展开信息）
    pub async fn list_grades_impl(&self, student_id: Option<i64>) -> Result<Vec<GradeInfo>> {
        let mut select = Grades::find();

        if let Some(student_id) = student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let grades: Vec<Grade> = select
            .order_by_desc(Column::GradedAt)
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询评分列表失败: {e}")))?
            .into_iter()
            .map(|m| m.into_grade())
            .collect();

        self.expand_grades(grades).await
    }

    /// 修正已有评分的分数与评语
    pub async fn update_grade_impl(
        &self,
        id: i64,
        teacher_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Option<Grade>> {
        let existing = self.get_grade_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            teacher_id: Set(teacher_id),
            points: Set(points),
            feedback: Set(feedback),
            graded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("更新评分失败: {e}")))?;

        Ok(Some(updated.into_grade()))
    }

    /// 展开单条评分
    pub async fn expand_grade_impl(&self, grade: Grade) -> Result<GradeInfo> {
        let mut expanded = self.expand_grades(vec![grade]).await?;
        expanded.pop().ok_or_else(|| {
            AssignCheckError::database_operation("评分展开结果为空".to_string())
        })
    }

    /// 批量展开评分的作业、学生与提交信息
    async fn expand_grades(&self, grades: Vec<Grade>) -> Result<Vec<GradeInfo>> {
        if grades.is_empty() {
            return Ok(vec![]);
        }

        let assignment_ids: Vec<i64> = grades
            .iter()
            .map(|g| g.assignment_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        let student_ids: Vec<i64> = grades
            .iter()
            .map(|g| g.student_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        let submission_ids: Vec<i64> = grades.iter().map(|g| g.submission_id).collect();

        let assignments = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询作业信息失败: {e}")))?;
        let assignment_map: HashMap<i64, GradeAssignmentInfo> = assignments
            .into_iter()
            .map(|m| {
                let a = m.into_assignment();
                (
                    a.id,
                    GradeAssignmentInfo {
                        id: a.id,
                        title: a.title,
                        subject: a.subject,
                        max_points: a.max_points,
                    },
                )
            })
            .collect();

        let users = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询学生信息失败: {e}")))?;
        let student_map: HashMap<i64, GradeStudentInfo> = users
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    GradeStudentInfo {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                        student_number: u.student_number,
                    },
                )
            })
            .collect();

        let submissions = Submissions::find()
            .filter(SubmissionColumn::Id.is_in(submission_ids))
            .all(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询提交信息失败: {e}")))?;
        let submission_map: HashMap<i64, GradeSubmissionInfo> = submissions
            .into_iter()
            .map(|m| {
                let s = m.into_submission();
                (
                    s.id,
                    GradeSubmissionInfo {
                        id: s.id,
                        file_name: s.file_name,
                        submitted_at: s.submitted_at,
                        is_late: s.is_late,
                    },
                )
            })
            .collect();

        Ok(grades
            .into_iter()
            .map(|g| {
                let assignment = assignment_map.get(&g.assignment_id).cloned();
                let student = student_map.get(&g.student_id).cloned();
                let submission = submission_map.get(&g.submission_id).cloned();
                GradeInfo::from_grade(g, assignment, student, submission)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        memory_storage, seed_assignment, seed_submission, seed_user,
    };
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::users::entities::UserRole;
    use chrono::Duration;

    #[tokio::test]
    async fn test_upsert_keeps_single_row_and_marks_graded() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let other_teacher = seed_user(&storage, "other", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;
        let submission = seed_submission(&storage, student, assignment.id).await;

        let first = storage
            .upsert_grade_impl(teacher, submission.id, 80, Some("不错".to_string()))
            .await
            .unwrap();
        assert_eq!(first.points, 80);
        assert_eq!(first.assignment_id, assignment.id);
        assert_eq!(first.student_id, student);

        // 任意教师可以覆盖已有评分
        let second = storage
            .upsert_grade_impl(other_teacher, submission.id, 95, None)
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.points, 95);
        assert_eq!(second.teacher_id, other_teacher);
        assert!(second.feedback.is_none());

        let all = storage.list_grades_impl(None).await.unwrap();
        assert_eq!(all.len(), 1);

        let reloaded = storage
            .get_submission_by_id_impl(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, SubmissionStatus::Graded);
    }

    #[tokio::test]
    async fn test_upsert_missing_submission() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;

        assert!(
            storage
                .upsert_grade_impl(teacher, 9999, 60, None)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_list_by_student_with_expansion() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let alice = seed_user(&storage, "alice", UserRole::Student).await;
        let bob = seed_user(&storage, "bob", UserRole::Student).await;
        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;

        let alice_sub = seed_submission(&storage, alice, assignment.id).await;
        let bob_sub = seed_submission(&storage, bob, assignment.id).await;
        storage
            .upsert_grade_impl(teacher, alice_sub.id, 70, None)
            .await
            .unwrap();
        storage
            .upsert_grade_impl(teacher, bob_sub.id, 90, None)
            .await
            .unwrap();

        let mine = storage.list_grades_impl(Some(alice)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].points, 70);
        let assignment_info = mine[0].assignment.as_ref().unwrap();
        assert_eq!(assignment_info.id, assignment.id);
        assert!(mine[0].student.is_some());
        assert_eq!(mine[0].submission.as_ref().unwrap().id, alice_sub.id);
    }

    #[tokio::test]
    async fn test_update_grade() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let assignment = seed_assignment(&storage, teacher, Duration::days(7)).await;
        let submission = seed_submission(&storage, student, assignment.id).await;

        let grade = storage
            .upsert_grade_impl(teacher, submission.id, 50, None)
            .await
            .unwrap();

        let updated = storage
            .update_grade_impl(grade.id, teacher, 65, Some("补交实验数据后重评".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.points, 65);
        assert!(updated.graded_at >= grade.graded_at);

        assert!(
            storage
                .update_grade_impl(9999, teacher, 60, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
