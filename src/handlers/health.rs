use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::models::ApiResponse;
use crate::services::mcp::MCP_SERVER_NAME;

pub async fn health_check() -> Result<HttpResponse> {
    let response = ApiResponse::success(json!({
        "status": "healthy",
        "service": MCP_SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }));
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
