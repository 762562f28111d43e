use super::entities::{AllowedFileType, Assignment};
use crate::models::submissions::entities::SubmissionStatus;
use serde::Serialize;

/// 作业创建者信息
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentCreatorInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// 作业详情（含创建者）
#[derive(Debug, Serialize)]
pub struct AssignmentInfo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub max_points: i32,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub instructions: Option<String>,
    pub allowed_file_types: Vec<AllowedFileType>,
    pub max_file_size: i64,
    pub creator: Option<AssignmentCreatorInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AssignmentInfo {
    pub fn from_assignment(assignment: Assignment, creator: Option<AssignmentCreatorInfo>) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
            description: assignment.description,
            subject: assignment.subject,
            max_points: assignment.max_points,
            due_date: assignment.due_date,
            instructions: assignment.instructions,
            allowed_file_types: assignment.allowed_file_types,
            max_file_size: assignment.max_file_size,
            creator,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}

/// 学生视角的本人提交摘要
#[derive(Debug, Serialize)]
pub struct StudentSubmissionBrief {
    pub id: i64,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub is_late: bool,
}

/// 学生视角的作业状态项
///
/// submission_status 为 "not_submitted" 或本人提交的当前状态；
/// is_overdue 仅在尚未提交且已过截止时间时为 true。
#[derive(Debug, Serialize)]
pub struct StudentAssignmentView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub max_points: i32,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub instructions: Option<String>,
    pub allowed_file_types: Vec<AllowedFileType>,
    pub max_file_size: i64,
    pub submission: Option<StudentSubmissionBrief>,
    pub submission_status: String,
    pub is_overdue: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
