use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段此时已是 argon2 哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量（用于启动播种判断）
    async fn count_users(&self) -> Result<u64>;

    /// 作业管理方法
    // 创建作业
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业，软删除的作业视为不存在
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 列出所有有效作业，创建时间倒序
    async fn list_assignments(&self) -> Result<Vec<Assignment>>;
    // 学生视角的作业列表（含本人提交状态与逾期标记），截止时间正序
    async fn list_student_assignment_views(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAssignmentView>>;
    // 部分更新作业
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 软删除作业（is_active 置 false）
    async fn soft_delete_assignment(&self, id: i64) -> Result<bool>;

    /// 提交管理方法
    // 创建提交，is_late 在此刻对照作业截止时间计算一次
    async fn create_submission(&self, student_id: i64, new: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 获取学生对某作业的最近一次提交
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出提交（含作业与学生展开信息），提交时间倒序
    async fn list_submissions(&self, filter: SubmissionListFilter) -> Result<Vec<SubmissionInfo>>;
    // 教师批阅：覆盖状态与批语
    async fn update_submission_review(
        &self,
        id: i64,
        status: SubmissionStatus,
        teacher_comments: Option<String>,
    ) -> Result<Option<Submission>>;
    // 展开单条提交的作业与学生信息
    async fn expand_submission(&self, submission: Submission) -> Result<SubmissionInfo>;

    /// 评分管理方法
    // 以 submission_id 为键的 upsert；冗余字段从提交重新拷贝，
    // 并无条件把提交状态置为 graded
    async fn upsert_grade(
        &self,
        teacher_id: i64,
        submission_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Grade>;
    // 通过ID获取评分
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    // 通过提交ID获取评分
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    // 列出评分（含展开信息），评分时间倒序；student_id 为 None 时列出全部
    async fn list_grades(&self, student_id: Option<i64>) -> Result<Vec<GradeInfo>>;
    // 更新评分（points/feedback/graded_at 原地覆盖）
    async fn update_grade(
        &self,
        id: i64,
        teacher_id: i64,
        points: i32,
        feedback: Option<String>,
    ) -> Result<Option<Grade>>;
    // 展开单条评分的关联信息
    async fn expand_grade(&self, grade: Grade) -> Result<GradeInfo>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
