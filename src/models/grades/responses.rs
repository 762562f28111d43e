use serde::Serialize;

use super::entities::Grade;

/// 评分关联的作业信息
#[derive(Debug, Clone, Serialize)]
pub struct GradeAssignmentInfo {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub max_points: i32,
}

/// 评分关联的学生信息
#[derive(Debug, Clone, Serialize)]
pub struct GradeStudentInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub student_number: Option<String>,
}

/// 评分关联的提交信息
#[derive(Debug, Clone, Serialize)]
pub struct GradeSubmissionInfo {
    pub id: i64,
    pub file_name: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub is_late: bool,
}

/// 评分详情（含作业、学生、提交展开信息）
#[derive(Debug, Serialize)]
pub struct GradeInfo {
    pub id: i64,
    pub submission_id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub points: i32,
    pub feedback: Option<String>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub assignment: Option<GradeAssignmentInfo>,
    pub student: Option<GradeStudentInfo>,
    pub submission: Option<GradeSubmissionInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl GradeInfo {
    pub fn from_grade(
        grade: Grade,
        assignment: Option<GradeAssignmentInfo>,
        student: Option<GradeStudentInfo>,
        submission: Option<GradeSubmissionInfo>,
    ) -> Self {
        Self {
            id: grade.id,
            submission_id: grade.submission_id,
            assignment_id: grade.assignment_id,
            student_id: grade.student_id,
            teacher_id: grade.teacher_id,
            points: grade.points,
            feedback: grade.feedback,
            graded_at: grade.graded_at,
            assignment,
            student,
            submission,
            created_at: grade.created_at,
            updated_at: grade.updated_at,
        }
    }
}
