//! MCP (JSON-RPC 2.0) 协议处理
//!
//! 同一个 [`McpServer`] 既服务于 HTTP 接口 `POST /api/v1/mcp`，
//! 也可以通过标准输入输出运行（每行一条 JSON 消息）。

use log::{info, warn};
use serde_json::{json, Map, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::ToolError;
use crate::services::market_service::MarketDataService;
use crate::services::tools;

pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
pub const MCP_SERVER_NAME: &str = "SSI Stock Market Data MCP Server";

/// JSON-RPC 错误
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    })
}

/// 工具执行结果，成功时同时返回文本和结构化内容
fn tool_result(data: Value) -> Value {
    let text = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": data,
        "isError": false
    })
}

fn tool_error(error: &ToolError) -> Value {
    json!({
        "content": [{ "type": "text", "text": error.to_string() }],
        "isError": true
    })
}

/// MCP 服务端
#[derive(Clone)]
pub struct McpServer {
    service: MarketDataService,
}

impl McpServer {
    pub fn new(service: MarketDataService) -> Self {
        Self { service }
    }

    /// 处理一条消息（单个请求或批量请求），返回需要回复的响应
    pub async fn handle_incoming_message(&self, incoming: Value) -> Vec<Value> {
        let mut responses = Vec::new();

        if let Value::Array(batch) = incoming {
            if batch.is_empty() {
                responses.push(error_response(
                    Value::Null,
                    RpcError::invalid_request("Batch request must not be empty"),
                ));
                return responses;
            }
            for item in batch {
                if let Some(response) = self.handle_single_message(item).await {
                    responses.push(response);
                }
            }
            return responses;
        }

        if let Some(response) = self.handle_single_message(incoming).await {
            responses.push(response);
        }
        responses
    }

    /// 处理一行原始文本，JSON 解析失败时返回 -32700
    pub async fn handle_raw_message(&self, raw: &str) -> Vec<Value> {
        match serde_json::from_str::<Value>(raw) {
            Ok(incoming) => self.handle_incoming_message(incoming).await,
            Err(e) => vec![error_response(
                Value::Null,
                RpcError::parse_error(format!("Parse error: {}", e)),
            )],
        }
    }

    async fn handle_single_message(&self, incoming: Value) -> Option<Value> {
        let Value::Object(mut obj) = incoming else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        let id = obj.remove("id");
        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Some(error_response(
                id.unwrap_or(Value::Null),
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        // 没有 method 的消息是客户端的响应，服务端不发起请求，直接忽略
        let method = obj.get("method").and_then(Value::as_str)?.to_string();
        let params = obj.remove("params").unwrap_or(Value::Null);

        match id {
            Some(id) => Some(match self.handle_request(&method, params).await {
                Ok(result) => success_response(id, result),
                Err(err) => error_response(id, err),
            }),
            None => {
                log::debug!("收到通知: {}", method);
                None
            }
        }
    }

    async fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let Value::Object(mut params) = params else {
            return Err(RpcError::invalid_params("tools/call params must be an object"));
        };

        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(RpcError::invalid_params(
                    "tools/call requires string field 'name'",
                ))
            }
        };

        let arguments = match params.remove("arguments") {
            Some(Value::Object(map)) => Value::Object(map),
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ))
            }
        };

        match tools::call_tool(&self.service, &name, arguments).await {
            Ok(data) => Ok(tool_result(data)),
            Err(ToolError::UnknownTool(name)) => {
                Err(RpcError::invalid_params(format!("Unknown tool: {}", name)))
            }
            Err(err) => {
                warn!("工具 {} 调用失败: {}", name, err);
                Ok(tool_error(&err))
            }
        }
    }

    /// 通过标准输入输出提供服务，直到输入结束
    pub async fn serve_stdio(&self) -> anyhow::Result<()> {
        info!("MCP 服务以 stdio 模式运行");

        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            for response in self.handle_raw_message(line).await {
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                stdout.write_all(&encoded).await?;
            }
            stdout.flush().await?;
        }

        info!("标准输入已关闭，MCP 服务退出");
        Ok(())
    }
}

fn initialize_payload() -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "serverInfo": {
            "name": MCP_SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn tools_list_payload() -> Value {
    json!({ "tools": tools::list_tools() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_service::tests::SpyApi;

    fn server(response: Value) -> McpServer {
        McpServer::new(MarketDataService::new(SpyApi::returning(response)))
    }

    async fn single(server: &McpServer, request: Value) -> Value {
        let mut responses = server.handle_incoming_message(request).await;
        assert_eq!(responses.len(), 1);
        responses.remove(0)
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let server = server(json!({}));

        let response = single(
            &server,
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        )
        .await;
        assert_eq!(response["id"], json!(1));
        assert_eq!(response["result"]["protocolVersion"], json!("2024-11-05"));
        assert_eq!(response["result"]["serverInfo"]["name"], json!(MCP_SERVER_NAME));

        let response = single(&server, json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/list" })).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call() {
        let server = server(json!({
            "status": 200,
            "data": [{ "Symbol": "SSI", "Open": "25.1" }]
        }));

        let response = single(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {
                    "name": "get_daily_ohlc",
                    "arguments": { "symbol": "SSI", "from_date": "01/01/2024", "to_date": "05/01/2024" }
                }
            }),
        )
        .await;

        let result = &response["result"];
        assert_eq!(result["isError"], json!(false));
        assert_eq!(result["structuredContent"]["data"][0]["Open"].as_f64(), Some(25.1));
        assert_eq!(result["content"][0]["type"], json!("text"));
    }

    #[tokio::test]
    async fn test_tool_failure_is_reported_in_result() {
        let server = server(json!({}));

        let response = single(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": { "name": "get_securities_list", "arguments": { "market": "NYSE" } }
            }),
        )
        .await;

        assert_eq!(response["result"]["isError"], json!(true));
        assert_eq!(
            response["result"]["content"][0]["text"],
            json!("Market must be one of: HOSE, HNX, UPCOM, DER")
        );
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server(json!({}));

        let response = single(&server, json!({ "jsonrpc": "2.0", "id": 3, "method": "resources/list" })).await;
        assert_eq!(response["error"]["code"], json!(-32601));

        let response = single(
            &server,
            json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": { "name": "get_weather" } }),
        )
        .await;
        assert_eq!(response["error"]["code"], json!(-32602));

        let response = single(&server, json!({ "jsonrpc": "1.0", "id": 5, "method": "ping" })).await;
        assert_eq!(response["error"]["code"], json!(-32600));
        assert_eq!(response["id"], json!(5));

        let response = single(&server, json!("ping")).await;
        assert_eq!(response["error"]["code"], json!(-32600));

        let responses = server.handle_raw_message("{not json").await;
        assert_eq!(responses[0]["error"]["code"], json!(-32700));
    }

    #[tokio::test]
    async fn test_batch_and_notifications() {
        let server = server(json!({}));

        let responses = server
            .handle_incoming_message(json!([
                { "jsonrpc": "2.0", "method": "notifications/initialized" },
                { "jsonrpc": "2.0", "id": 1, "method": "ping" },
                { "jsonrpc": "2.0", "id": 2, "method": "ping" }
            ]))
            .await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1]["id"], json!(2));
        assert_eq!(responses[1]["result"], json!({}));

        let responses = server
            .handle_incoming_message(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await;
        assert!(responses.is_empty());

        let responses = server.handle_incoming_message(json!([])).await;
        assert_eq!(responses[0]["error"]["code"], json!(-32600));
    }
}
