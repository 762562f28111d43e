use serde::Deserialize;

/// 评分请求（创建或覆盖）
#[derive(Debug, Deserialize)]
pub struct CreateGradeRequest {
    pub submission_id: i64,
    pub points: i32,
    pub feedback: Option<String>,
}

/// 更新评分请求
#[derive(Debug, Deserialize)]
pub struct UpdateGradeRequest {
    pub points: i32,
    pub feedback: Option<String>,
}
