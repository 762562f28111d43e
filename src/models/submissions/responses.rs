use serde::Serialize;

use super::entities::{Submission, SubmissionStatus};

/// 提交学生信息
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStudentInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub student_number: Option<String>,
}

/// 提交关联的作业信息
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAssignmentInfo {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub max_points: i32,
    pub due_date: chrono::DateTime<chrono::Utc>,
}

/// 提交详情（含作业与学生展开信息）
#[derive(Debug, Serialize)]
pub struct SubmissionInfo {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_name: String,
    pub file_size: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub status: SubmissionStatus,
    pub comments: Option<String>,
    pub teacher_comments: Option<String>,
    pub is_late: bool,
    pub assignment: Option<SubmissionAssignmentInfo>,
    pub student: Option<SubmissionStudentInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SubmissionInfo {
    pub fn from_submission(
        submission: Submission,
        assignment: Option<SubmissionAssignmentInfo>,
        student: Option<SubmissionStudentInfo>,
    ) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            file_name: submission.file_name,
            file_size: submission.file_size,
            submitted_at: submission.submitted_at,
            status: submission.status,
            comments: submission.comments,
            teacher_comments: submission.teacher_comments,
            is_late: submission.is_late,
            assignment,
            student,
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}
