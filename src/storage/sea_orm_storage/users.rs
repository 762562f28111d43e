//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AssignCheckError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            student_number: Set(req.student_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AssignCheckError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = memory_storage().await;

        let user = storage
            .create_user_impl(CreateUserRequest {
                name: "李老师".to_string(),
                email: "li@example.com".to_string(),
                password: "hash".to_string(),
                role: UserRole::Teacher,
                student_number: None,
            })
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Teacher);

        let by_email = storage
            .get_user_by_email_impl("li@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
        assert!(storage.get_user_by_id_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = memory_storage().await;

        let req = |email: &str| CreateUserRequest {
            name: "王同学".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            role: UserRole::Student,
            student_number: Some("S2026001".to_string()),
        };

        storage.create_user_impl(req("wang@example.com")).await.unwrap();
        assert!(
            storage
                .create_user_impl(req("wang@example.com"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let storage = memory_storage().await;
        let id = super::super::test_support::seed_user(&storage, "stu", UserRole::Student).await;

        assert!(storage.update_last_login_impl(id).await.unwrap());
        let user = storage.get_user_by_id_impl(id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());

        assert!(!storage.update_last_login_impl(id + 100).await.unwrap());
    }
}
