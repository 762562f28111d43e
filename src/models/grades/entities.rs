use serde::{Deserialize, Serialize};

/// 评分实体
///
/// 以 submission_id 为唯一键，一个提交至多一条评分；
/// assignment_id 和 student_id 是从提交冗余复制的读优化字段，
/// 写入时始终以关联提交为准重新拷贝。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    // 评分教师 ID
    pub teacher_id: i64,
    // 得分，0 ≤ points ≤ 作业满分
    pub points: i32,
    // 评语
    pub feedback: Option<String>,
    // 评分时间，每次重新评分都会刷新
    pub graded_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
