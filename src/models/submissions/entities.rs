use serde::{Deserialize, Serialize};

// 提交状态
//
// submitted 是唯一的初始状态；graded 除了可由教师手动设置外，
// 还会在评分落库时被强制写入。状态之间不设转移表，任意状态可达。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,   // 已提交
    UnderReview, // 批阅中
    Graded,      // 已评分
    Accepted,    // 已通过
    Rejected,    // 已退回
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const UNDER_REVIEW: &'static str = "under_review";
    pub const GRADED: &'static str = "graded";
    pub const ACCEPTED: &'static str = "accepted";
    pub const REJECTED: &'static str = "rejected";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持: submitted, under_review, graded, accepted, rejected"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::UnderReview => Self::UNDER_REVIEW,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::Accepted => Self::ACCEPTED,
            SubmissionStatus::Rejected => Self::REJECTED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::UNDER_REVIEW => Ok(SubmissionStatus::UnderReview),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::ACCEPTED => Ok(SubmissionStatus::Accepted),
            Self::REJECTED => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    // 唯一 ID
    pub id: i64,
    // 关联的作业 ID
    pub assignment_id: i64,
    // 提交学生 ID
    pub student_id: i64,
    // 原始文件名
    pub file_name: String,
    // 存储定位符（本地路径）
    pub file_path: String,
    // 文件大小（字节）
    pub file_size: i64,
    // 提交时间
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    // 当前状态
    pub status: SubmissionStatus,
    // 学生留言
    pub comments: Option<String>,
    // 教师批语
    pub teacher_comments: Option<String>,
    // 是否迟交，创建时对照作业截止时间计算一次，之后不再变化
    pub is_late: bool,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            SubmissionStatus::Submitted,
            SubmissionStatus::UnderReview,
            SubmissionStatus::Graded,
            SubmissionStatus::Accepted,
            SubmissionStatus::Rejected,
        ] {
            assert_eq!(SubmissionStatus::from_str(&s.to_string()).unwrap(), s);
        }
        assert!(SubmissionStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_status_json_snake_case() {
        let json = serde_json::to_string(&SubmissionStatus::UnderReview).unwrap();
        assert_eq!(json, r#""under_review""#);
        let back: SubmissionStatus = serde_json::from_str(r#""accepted""#).unwrap();
        assert_eq!(back, SubmissionStatus::Accepted);
    }
}
