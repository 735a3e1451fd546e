//! 配置模块
//!
//! 先从 JSON 文件加载配置，再用环境变量覆盖（支持 .env 文件）

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// MCP 传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// HTTP 服务（REST + MCP JSON-RPC）
    Http,
    /// 标准输入输出，每行一条 JSON-RPC 消息
    Stdio,
}

impl Transport {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Some(Transport::Http),
            "stdio" => Some(Transport::Stdio),
            _ => None,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// 传输方式
    #[serde(default = "default_transport")]
    pub transport: Transport,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 上游请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 上游连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// SSI FastConnect Data 认证配置
#[derive(Clone, Serialize, Deserialize)]
pub struct FcDataConfig {
    /// 服务地址
    #[serde(default = "default_fc_data_url")]
    pub url: String,
    /// 认证方式
    #[serde(default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default)]
    pub consumer_id: String,
    #[serde(default)]
    pub consumer_secret: String,
}

impl std::fmt::Debug for FcDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FcDataConfig")
            .field("url", &self.url)
            .field("auth_type", &self.auth_type)
            .field("consumer_id", &self.consumer_id)
            .field("consumer_secret", &"***")
            .finish()
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub fc_data: FcDataConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_transport() -> Transport { Transport::Stdio }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_fc_data_url() -> String { "https://fc-data.ssi.com.vn/".to_string() }
fn default_auth_type() -> String { "Bearer".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            transport: default_transport(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for FcDataConfig {
    fn default() -> Self {
        Self {
            url: default_fc_data_url(),
            auth_type: default_auth_type(),
            consumer_id: String::new(),
            consumer_secret: String::new(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置：文件（可选）+ 环境变量覆盖
    ///
    /// 在日志初始化之前调用，因此这里只返回提示信息，由调用方输出
    pub fn load() -> (Self, Vec<String>) {
        let mut notes = Vec::new();
        match dotenvy::dotenv() {
            Ok(path) => notes.push(format!("已加载环境变量文件 {}", path.display())),
            Err(_) => notes.push("未找到 .env 文件，使用系统环境变量".to_string()),
        }

        let mut config = Self::load_file(&mut notes);
        config.apply_env(|key| env::var(key).ok());
        (config, notes)
    }

    fn load_file(notes: &mut Vec<String>) -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        notes.push(format!("从 {} 加载配置成功", path));
                        return config;
                    }
                    Err(e) => {
                        notes.push(format!("加载配置文件 {} 失败: {}", path, e));
                    }
                }
            }
        }

        notes.push("使用默认配置".to_string());
        Self::default()
    }

    /// 用环境变量覆盖配置项，空值不覆盖
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("FC_DATA_URL") {
            self.fc_data.url = url;
        }
        if let Some(auth_type) = get("FC_DATA_AUTH_TYPE") {
            self.fc_data.auth_type = auth_type;
        }
        if let Some(id) = get("FC_DATA_CONSUMER_ID") {
            self.fc_data.consumer_id = id;
        }
        if let Some(secret) = get("FC_DATA_CONSUMER_SECRET") {
            self.fc_data.consumer_secret = secret;
        }
        if let Some(api_key) = get("API_KEY") {
            self.api.api_key = api_key;
        }
        if let Some(transport) = get("MCP_TRANSPORT").and_then(|v| Transport::parse(&v)) {
            self.server.transport = transport;
        }
    }

    /// 检查上游认证信息，返回缺失的环境变量名
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.fc_data.consumer_id.is_empty() {
            missing.push("FC_DATA_CONSUMER_ID");
        }
        if self.fc_data.consumer_secret.is_empty() {
            missing.push("FC_DATA_CONSUMER_SECRET");
        }
        missing
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
