use super::entities::AllowedFileType;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 创建作业请求
#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub max_points: i32,
    pub due_date: DateTime<Utc>, // ISO 8601 格式，如 "2026-09-01T12:00:00Z"
    pub instructions: Option<String>,
    pub allowed_file_types: Option<Vec<AllowedFileType>>,
    pub max_file_size: Option<i64>,
}

/// 更新作业请求
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub max_points: Option<i32>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式
    pub instructions: Option<String>,
    pub allowed_file_types: Option<Vec<AllowedFileType>>,
    pub max_file_size: Option<i64>,
}
