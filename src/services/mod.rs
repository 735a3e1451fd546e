//! 业务逻辑服务模块
//!
//! 参数校验、上游请求、响应规范化，以及对外的工具与 MCP 协议层

pub mod fc_data;        // SSI FastConnect Data 客户端
pub mod market_service; // 行情数据服务
pub mod mcp;            // MCP JSON-RPC 协议
pub mod normalizer;     // 响应规范化
pub mod tools;          // 工具注册表
pub mod validator;      // 参数校验

pub use market_service::MarketDataService;
pub use mcp::McpServer;
