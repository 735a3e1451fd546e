//! 工具描述模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 工具描述，供 tools/list 与 GET /tools 返回
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// 工具名称（调用时使用）
    pub name: String,
    /// 一行说明
    pub description: String,
    /// 参数的 JSON Schema
    pub input_schema: Value,
}
