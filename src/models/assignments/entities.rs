use serde::{Deserialize, Serialize};

/// 提交附件允许的文件类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllowedFileType {
    Pdf,
    Doc,
    Docx,
    Txt,
    Zip,
    Rar,
}

impl AllowedFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllowedFileType::Pdf => "pdf",
            AllowedFileType::Doc => "doc",
            AllowedFileType::Docx => "docx",
            AllowedFileType::Txt => "txt",
            AllowedFileType::Zip => "zip",
            AllowedFileType::Rar => "rar",
        }
    }

    /// 全集，作业未显式指定文件类型时使用
    pub fn all() -> Vec<AllowedFileType> {
        vec![
            AllowedFileType::Pdf,
            AllowedFileType::Doc,
            AllowedFileType::Docx,
            AllowedFileType::Txt,
            AllowedFileType::Zip,
            AllowedFileType::Rar,
        ]
    }
}

impl<'de> Deserialize<'de> for AllowedFileType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!(
                "无效的文件类型: '{s}'. 支持: pdf, doc, docx, txt, zip, rar"
            )))
    }
}

impl std::fmt::Display for AllowedFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AllowedFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(AllowedFileType::Pdf),
            "doc" => Ok(AllowedFileType::Doc),
            "docx" => Ok(AllowedFileType::Docx),
            "txt" => Ok(AllowedFileType::Txt),
            "zip" => Ok(AllowedFileType::Zip),
            "rar" => Ok(AllowedFileType::Rar),
            _ => Err(format!("Invalid file type: {s}")),
        }
    }
}

/// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: String,
    // 科目
    pub subject: String,
    // 满分
    pub max_points: i32,
    // 截止时间
    pub due_date: chrono::DateTime<chrono::Utc>,
    // 创建者（教师）ID
    pub created_by: i64,
    // 补充说明
    pub instructions: Option<String>,
    // 允许的提交文件类型
    pub allowed_file_types: Vec<AllowedFileType>,
    // 提交文件大小上限（字节）
    pub max_file_size: i64,
    // 软删除标记，删除即置 false
    pub is_active: bool,
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
    fn test_allowed_file_type_roundtrip() {
        for ft in AllowedFileType::all() {
            assert_eq!(AllowedFileType::from_str(ft.as_str()).unwrap(), ft);
        }
        assert!(AllowedFileType::from_str("exe").is_err());
    }

    #[test]
    fn test_allowed_file_type_json() {
        let types = vec![AllowedFileType::Pdf, AllowedFileType::Zip];
        let json = serde_json::to_string(&types).unwrap();
        assert_eq!(json, r#"["pdf","zip"]"#);
        let back: Vec<AllowedFileType> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, types);
    }
}
