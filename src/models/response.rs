//! 通用 API 响应模型
//!
//! REST 接口统一返回格式；MCP 接口不使用该结构

use serde::{Deserialize, Serialize};
use chrono::Utc;
use chrono_tz::Asia::Ho_Chi_Minh;

/// 获取越南时间（UTC+7）
pub fn get_vietnam_time() -> String {
    Utc::now().with_timezone(&Ho_Chi_Minh).to_rfc3339()
}

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（越南时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    /// ISO 8601 格式
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_vietnam_time(),
        }
    }

    /// 创建错误响应
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_vietnam_time(),
        }
    }
}
