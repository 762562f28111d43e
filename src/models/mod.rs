//! 数据模型定义
//!
//! 按领域划分：用户、认证、作业、提交、评分，以及通用响应结构。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod grades;
pub mod submissions;
pub mod users;

pub use common::response::ApiResponse;

/// 应用启动时间，随 app_data 注入
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，嵌入统一响应结构的 code 字段
///
/// 约定：HTTP 状态码 * 100 + 序号，0 表示成功。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 40000,
    ValidationError = 40001,
    DuplicateSubmission = 40002,

    Unauthorized = 40100,
    InvalidCredentials = 40101,
    TokenExpired = 40102,

    Forbidden = 40300,

    NotFound = 40400,
    UserNotFound = 40401,
    AssignmentNotFound = 40402,
    SubmissionNotFound = 40403,
    GradeNotFound = 40404,
    FileNotFound = 40405,

    Conflict = 40900,
    UserAlreadyExists = 40901,

    InternalServerError = 50000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::ValidationError as i32, 40001);
        assert_eq!(ErrorCode::Forbidden as i32, 40300);
        assert_eq!(ErrorCode::AssignmentNotFound as i32, 40402);
        assert_eq!(ErrorCode::InternalServerError as i32, 50000);
    }
}
