//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod grades;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{AssignCheckError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AssignCheckError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AssignCheckError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AssignCheckError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AssignCheckError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AssignCheckError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::StudentAssignmentView,
    },
    grades::{entities::Grade, responses::GradeInfo},
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListFilter},
        responses::SubmissionInfo,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, req).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        self.list_assignments_impl().await
    }

    async fn list_student_assignment_views(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAssignmentView>> {
        self.list_student_assignment_views_impl(student_id).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn soft_delete_assignment(&self, id: i64) -> Result<bool> {
        self.soft_delete_assignment_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, student_id: i64, new: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(student_id, new).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_submissions(&self, filter: SubmissionListFilter) -> Result<Vec<SubmissionInfo>> {
        self.list_submissions_impl(filter).await
    }

    async fn update_submission_review(
        &self,
        id: i64,
        status: SubmissionStatus,
        teacher_comments: Option<String>,
    ) -> Result<Option<Submission>> {
        self.update_submission_review_impl(id, status, teacher_comments)
            .await
    }

    async fn expand_submission(&self, submission: Submission) -> Result<SubmissionInfo> {
        self.expand_submission_impl(submission).await
    }

    // 评分模块
    async fn upsert_grade(
        &self,
        teacher_id: i64,
        submission_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Grade> {
        self.upsert_grade_impl(teacher_id, submission_id, points, feedback)
            .await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_id_impl(submission_id).await
    }

    async fn list_grades(&self, student_id: Option<i64>) -> Result<Vec<GradeInfo>> {
        self.list_grades_impl(student_id).await
    }

    async fn update_grade(
        &self,
        id: i64,
        teacher_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(id, teacher_id, points, feedback)
            .await
    }

    async fn expand_grade(&self, grade: Grade) -> Result<GradeInfo> {
        self.expand_grade_impl(grade).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    /// 内存 SQLite 存储，每个测试独立建库并跑完整迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect sqlite::memory:");
        Migrator::up(&db, None).await.expect("run migrations");
        SeaOrmStorage { db }
    }

    pub async fn seed_user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> i64 {
        let user = storage
            .create_user_impl(CreateUserRequest {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                password: "not-a-real-hash".to_string(),
                role,
                student_number: None,
            })
            .await
            .expect("create user");
        user.id
    }

    pub async fn seed_assignment(
        storage: &SeaOrmStorage,
        teacher_id: i64,
        due_in: chrono::Duration,
    ) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::requests::CreateAssignmentRequest;

        storage
            .create_assignment_impl(
                teacher_id,
                CreateAssignmentRequest {
                    title: "第一次实验报告".to_string(),
                    description: "提交实验报告 PDF".to_string(),
                    subject: "物理".to_string(),
                    max_points: 100,
                    due_date: chrono::Utc::now() + due_in,
                    instructions: None,
                    allowed_file_types: None,
                    max_file_size: None,
                },
            )
            .await
            .expect("create assignment")
    }

    pub async fn seed_submission(
        storage: &SeaOrmStorage,
        student_id: i64,
        assignment_id: i64,
    ) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::requests::NewSubmission;

        storage
            .create_submission_impl(
                student_id,
                NewSubmission {
                    assignment_id,
                    file_name: "report.pdf".to_string(),
                    file_path: format!("uploads/{student_id}-{assignment_id}.bin"),
                    file_size: 128,
                    comments: None,
                },
            )
            .await
            .expect("create submission")
    }
}
