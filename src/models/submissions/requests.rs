use super::entities::SubmissionStatus;
use serde::Deserialize;

/// 更新提交状态请求（教师批阅）
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionStatusRequest {
    pub status: SubmissionStatus,
    pub teacher_comments: Option<String>,
}

// 新建提交的内部参数（multipart 解析完成后交给存储层）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub comments: Option<String>,
}

/// 提交列表筛选条件
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionListFilter {
    // 仅列出该学生的提交
    pub student_id: Option<i64>,
    // 仅列出迟交的提交
    pub late_only: bool,
}
