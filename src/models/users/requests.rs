use super::entities::UserRole;
use serde::Deserialize;

// 用户创建请求（注册与启动播种共用）
//
// password 字段在进入存储层之前必须替换为 argon2 哈希。
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub student_number: Option<String>,
}
