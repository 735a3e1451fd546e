//! 工具调用错误类型
//!
//! 字段级别的异常（缺失、类型错误、数量不一致）不属于错误，
//! 由规范化模块修复并记录警告，不会出现在这里。

use thiserror::Error;

/// 单次工具调用可能返回的错误
#[derive(Debug, Error)]
pub enum ToolError {
    /// 必填参数缺失或枚举参数越界，在请求上游之前抛出
    #[error("{0}")]
    InvalidArgument(String),

    /// 上游返回的数据不是 JSON 对象
    #[error("Invalid response format")]
    InvalidResponseFormat,

    /// 未注册的工具名称
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// 上游传输或认证失败，原样透传
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ToolError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ToolError::InvalidArgument(message.into())
    }

    /// 是否由调用方参数导致
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidArgument(_) | ToolError::UnknownTool(_)
        )
    }
}
