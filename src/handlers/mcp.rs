use actix_web::{web, HttpResponse, Result};

use crate::services::McpServer;

/// MCP JSON-RPC 入口
///
/// 单个请求返回对象，批量请求返回数组；只有通知时返回 202。
pub async fn handle_mcp(server: web::Data<McpServer>, body: web::Bytes) -> Result<HttpResponse> {
    let raw = String::from_utf8_lossy(&body);
    let is_batch = raw.trim_start().starts_with('[');

    let mut responses = server.handle_raw_message(&raw).await;

    if responses.is_empty() {
        return Ok(HttpResponse::Accepted().finish());
    }
    if is_batch {
        return Ok(HttpResponse::Ok().json(responses));
    }
    Ok(HttpResponse::Ok().json(responses.remove(0)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/mcp", web::post().to(handle_mcp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_service::tests::SpyApi;
    use crate::services::MarketDataService;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn server() -> web::Data<McpServer> {
        let service = MarketDataService::new(SpyApi::returning(json!({ "status": 200, "data": [] })));
        web::Data::new(McpServer::new(service))
    }

    #[actix_web::test]
    async fn test_single_request() {
        let app = test::init_service(App::new().app_data(server()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], json!(1));
        assert_eq!(body["result"]["tools"].as_array().map(Vec::len), Some(8));
    }

    #[actix_web::test]
    async fn test_batch_and_notification() {
        let app = test::init_service(App::new().app_data(server()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!([
                { "jsonrpc": "2.0", "id": 1, "method": "ping" },
                { "jsonrpc": "2.0", "method": "notifications/initialized" }
            ]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{ "jsonrpc": "2.0", "id": 1, "result": {} }]));

        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_json(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn test_parse_error() {
        let app = test::init_service(App::new().app_data(server()).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/mcp")
            .set_payload("{\"jsonrpc\":")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"]["code"], json!(-32700));
    }
}
