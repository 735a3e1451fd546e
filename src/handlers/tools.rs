use actix_web::{web, HttpResponse, Result};
use serde_json::Value;

use crate::models::{ApiResponse, ToolDescriptor};
use crate::services::{tools, MarketDataService};

/// 列出所有工具
pub async fn list_tools() -> Result<HttpResponse> {
    let response = ApiResponse::success(tools::list_tools());
    Ok(HttpResponse::Ok().json(response))
}

/// 调用工具，请求体为工具参数（可为空）
pub async fn call_tool(
    service: web::Data<MarketDataService>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let name = path.into_inner();

    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(arguments) => arguments,
            Err(e) => {
                let response =
                    ApiResponse::<Value>::error(format!("Invalid JSON body: {}", e));
                return Ok(HttpResponse::BadRequest().json(response));
            }
        }
    };

    match tools::call_tool(&service, &name, arguments).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => {
            let response = ApiResponse::<Value>::error(e.to_string());
            if e.is_caller_error() {
                Ok(HttpResponse::BadRequest().json(response))
            } else {
                log::error!("工具 {} 调用失败: {}", name, e);
                Ok(HttpResponse::BadGateway().json(response))
            }
        }
    }
}

/// 获取单个工具描述
pub async fn get_tool(path: web::Path<String>) -> Result<HttpResponse> {
    let name = path.into_inner();
    match tools::get_tool(&name) {
        Some(tool) => Ok(HttpResponse::Ok().json(ApiResponse::success(tool))),
        None => {
            let response = ApiResponse::<ToolDescriptor>::error(format!("Unknown tool: {}", name));
            Ok(HttpResponse::NotFound().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tools")
            .route("", web::get().to(list_tools))
            .route("/{name}", web::get().to(get_tool))
            .route("/{name}", web::post().to(call_tool)),
    );
}
