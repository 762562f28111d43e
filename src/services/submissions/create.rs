use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::{fs::File, path::Path};
use uuid::Uuid;

use super::SubmissionService;
use crate::config::AppConfig;
use crate::errors::AssignCheckError;
use crate::models::submissions::requests::NewSubmission;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate_magic_bytes;

// multipart 解析的中间结果
#[derive(Default)]
struct ParsedUpload {
    assignment_id: Option<i64>,
    comments: Option<String>,
    file_name: String,
    stored_path: Option<String>,
    file_size: i64,
}

impl ParsedUpload {
    // 校验失败时清除已落盘的临时文件
    fn discard(&self) {
        if let Some(path) = &self.stored_path {
            let _ = fs::remove_file(path);
        }
    }
}

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

// 重复提交策略检查，返回 Some 表示拒绝
async fn check_resubmission_policy(
    storage: &Arc<dyn Storage>,
    allow_resubmission: bool,
    assignment_id: i64,
    student_id: i64,
) -> Option<HttpResponse> {
    if allow_resubmission {
        return None;
    }

    match storage
        .get_submission_by_assignment_and_student(assignment_id, student_id)
        .await
    {
        Ok(Some(_)) => Some(bad_request(
            ErrorCode::DuplicateSubmission,
            "该作业已提交过，不允许重复提交",
        )),
        Ok(None) => None,
        Err(e) => Some(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询提交记录失败: {e}"),
            )),
        ),
    }
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, actix_web::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub async fn handle_create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    student_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;

    // 确保上传目录存在
    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", AssignCheckError::file_operation(format!("{e}")));
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error_empty(
                ErrorCode::InternalServerError,
                "创建上传目录失败",
            )),
        );
    }

    let mut parsed = ParsedUpload::default();
    let mut extension = String::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "assignment_id" => {
                let text = read_text_field(&mut field).await?;
                match text.trim().parse::<i64>() {
                    Ok(id) => parsed.assignment_id = Some(id),
                    Err(_) => {
                        parsed.discard();
                        return Ok(bad_request(
                            ErrorCode::ValidationError,
                            "assignment_id 必须为整数",
                        ));
                    }
                }
            }
            "comments" => {
                let text = read_text_field(&mut field).await?;
                if !text.trim().is_empty() {
                    parsed.comments = Some(text);
                }
            }
            "file" => {
                if parsed.stored_path.is_some() {
                    parsed.discard();
                    return Ok(bad_request(
                        ErrorCode::ValidationError,
                        "一次只能上传一个文件",
                    ));
                }

                parsed.file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                // 提取扩展名并对照全局允许列表
                extension = Path::new(&parsed.file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_lowercase())
                    .unwrap_or_default();

                if !config
                    .upload
                    .allowed_extensions
                    .iter()
                    .any(|t| t.to_lowercase() == extension)
                {
                    return Ok(bad_request(ErrorCode::ValidationError, "不允许的文件类型"));
                }

                let stored_name =
                    format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
                let file_path = format!("{upload_dir}/{stored_name}");
                let mut f = match File::create(&file_path) {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!("{}", AssignCheckError::file_operation(format!("{e}")));
                        return Ok(HttpResponse::InternalServerError().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::InternalServerError,
                                "文件创建失败",
                            ),
                        ));
                    }
                };

                let mut total_size: usize = 0;
                let mut first_chunk = true;
                while let Some(chunk) = field.next().await {
                    let data = chunk?;

                    // 第一个 chunk 时验证魔术字节
                    if first_chunk {
                        first_chunk = false;
                        if !validate_magic_bytes(&data, &format!(".{extension}")) {
                            let _ = fs::remove_file(&file_path);
                            return Ok(bad_request(
                                ErrorCode::ValidationError,
                                "文件内容与扩展名不匹配",
                            ));
                        }
                    }

                    total_size += data.len();
                    // 全局大小上限，作业级别的上限在解析完成后校验
                    if total_size > config.upload.max_size {
                        let _ = fs::remove_file(&file_path);
                        return Ok(bad_request(ErrorCode::ValidationError, "文件大小超出限制"));
                    }
                    f.write_all(&data)?;
                }

                parsed.file_size = total_size as i64;
                parsed.stored_path = Some(file_path);
            }
            _ => {
                // 忽略未知字段
                while let Some(chunk) = field.next().await {
                    let _ = chunk?;
                }
            }
        }
    }

    let Some(file_path) = parsed.stored_path.clone() else {
        return Ok(bad_request(ErrorCode::ValidationError, "缺少提交文件"));
    };
    let Some(assignment_id) = parsed.assignment_id else {
        parsed.discard();
        return Ok(bad_request(ErrorCode::ValidationError, "缺少 assignment_id"));
    };

    let storage = service.get_storage(request);

    // 作业必须存在且未删除
    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            parsed.discard();
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => {
            parsed.discard();
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询作业失败: {e}"),
                )),
            );
        }
    };

    // 作业级别的文件类型与大小限制
    if !assignment
        .allowed_file_types
        .iter()
        .any(|t| t.as_str() == extension)
    {
        parsed.discard();
        return Ok(bad_request(
            ErrorCode::ValidationError,
            "该作业不接受此文件类型",
        ));
    }

    if parsed.file_size > assignment.max_file_size {
        parsed.discard();
        return Ok(bad_request(
            ErrorCode::ValidationError,
            "文件大小超出该作业限制",
        ));
    }

    // 重复提交策略
    if let Some(resp) = check_resubmission_policy(
        &storage,
        config.submission.allow_resubmission,
        assignment_id,
        student_id,
    )
    .await
    {
        parsed.discard();
        return Ok(resp);
    }

    let new_submission = NewSubmission {
        assignment_id,
        file_name: parsed.file_name.clone(),
        file_path,
        file_size: parsed.file_size,
        comments: parsed.comments.clone(),
    };

    match storage.create_submission(student_id, new_submission).await {
        Ok(submission) => match storage.expand_submission(submission).await {
            Ok(info) => Ok(HttpResponse::Created().json(ApiResponse::success(info, "提交成功"))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("提交创建成功但查询失败: {e}"),
                )),
            ),
        },
        Err(e) => {
            parsed.discard();
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("创建提交失败: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, seed_assignment, seed_submission, seed_user,
    };
    use actix_web::http::StatusCode;
    use actix_web::http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use actix_web::test::TestRequest;
    use actix_web::web::Bytes;

    const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";

    fn multipart_payload(body: Vec<u8>) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap(),
        );
        let stream = futures_util::stream::once(async move {
            Ok::<_, actix_web::error::PayloadError>(Bytes::from(body))
        });
        Multipart::new(&headers, stream)
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .into_bytes()
    }

    fn file_part(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(content);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn closing() -> Vec<u8> {
        format!("--{BOUNDARY}--\r\n").into_bytes()
    }

    fn service_over(storage: Arc<dyn Storage>) -> SubmissionService {
        SubmissionService {
            storage: Some(storage),
        }
    }

    #[tokio::test]
    async fn test_create_without_file_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let service = service_over(storage);
        let req = TestRequest::default().to_http_request();

        let mut body = text_part("assignment_id", "1");
        body.extend_from_slice(&closing());

        let resp = handle_create_submission(&service, &req, 1, multipart_payload(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_disallowed_extension_rejected() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        let service = service_over(Arc::new(raw));
        let req = TestRequest::default().to_http_request();

        let mut body = text_part("assignment_id", &assignment.id.to_string());
        body.extend_from_slice(&file_part("report.exe", b"MZ fake binary"));
        body.extend_from_slice(&closing());

        let resp = handle_create_submission(&service, &req, student, multipart_payload(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_magic_byte_mismatch_rejected() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        let service = service_over(Arc::new(raw));
        let req = TestRequest::default().to_http_request();

        // 扩展名为 pdf 但内容不是 PDF
        let mut body = text_part("assignment_id", &assignment.id.to_string());
        body.extend_from_slice(&file_part("report.pdf", b"plain text, not a pdf"));
        body.extend_from_slice(&closing());

        let resp = handle_create_submission(&service, &req, student, multipart_payload(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_success_and_unknown_assignment() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(raw);
        let service = service_over(storage.clone());
        let req = TestRequest::default().to_http_request();

        let mut body = text_part("assignment_id", &assignment.id.to_string());
        body.extend_from_slice(&file_part("report.pdf", b"%PDF-1.4 test content"));
        body.extend_from_slice(&closing());

        let resp = handle_create_submission(&service, &req, student, multipart_payload(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let submission = storage
            .get_submission_by_assignment_and_student(assignment.id, student)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.file_name, "report.pdf");
        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert!(!submission.is_late);
        let _ = fs::remove_file(&submission.file_path);

        // 不存在的作业
        let mut body = text_part("assignment_id", "9999");
        body.extend_from_slice(&file_part("report.pdf", b"%PDF-1.4 test content"));
        body.extend_from_slice(&closing());

        let resp = handle_create_submission(&service, &req, student, multipart_payload(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resubmission_policy() {
        let raw = memory_storage().await;
        let teacher = seed_user(&raw, "teacher", UserRole::Teacher).await;
        let assignment = seed_assignment(&raw, teacher, chrono::Duration::days(7)).await;
        let student = seed_user(&raw, "student", UserRole::Student).await;
        seed_submission(&raw, student, assignment.id).await;
        let storage: Arc<dyn Storage> = Arc::new(raw);

        // 允许重复提交时直接放行
        assert!(
            check_resubmission_policy(&storage, true, assignment.id, student)
                .await
                .is_none()
        );

        // 禁止重复提交且已有提交 -> 400 且带专用错误码
        let resp = check_resubmission_policy(&storage, false, assignment.id, student)
            .await
            .expect("duplicate submission should be rejected");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::DuplicateSubmission as i32);

        // 禁止重复提交但尚无提交 -> 放行
        let other = seed_user_other(&storage).await;
        assert!(
            check_resubmission_policy(&storage, false, assignment.id, other)
                .await
                .is_none()
        );
    }

    // 通过 trait 口径再建一个学生，避免复用已有提交
    async fn seed_user_other(storage: &Arc<dyn Storage>) -> i64 {
        use crate::models::users::requests::CreateUserRequest;

        storage
            .create_user(CreateUserRequest {
                name: "student2".to_string(),
                email: "student2@example.com".to_string(),
                password: "not-a-real-hash".to_string(),
                role: UserRole::Student,
                student_number: None,
            })
            .await
            .unwrap()
            .id
    }
}
