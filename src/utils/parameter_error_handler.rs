//! 请求参数解析错误处理
//!
//! actix 默认的反序列化错误是纯文本，这里统一转成标准响应结构。

use actix_web::{HttpRequest, error::Error, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析错误处理
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> Error {
    let message = format!("请求体解析失败: {err}");
    let response = actix_web::HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

/// Query 参数解析错误处理
pub fn query_error_handler(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> Error {
    let message = format!("查询参数解析失败: {err}");
    let response = actix_web::HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

/// Path 参数解析错误处理
pub fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> Error {
    let message = format!("路径参数解析失败: {err}");
    let response = actix_web::HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}
