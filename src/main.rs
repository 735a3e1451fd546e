//! SSI 越南股票行情 MCP 服务
//!
//! 通过 MCP 工具协议提供越南证券市场数据（证券列表、指数、OHLC、每日价格）
//! 数据来源：SSI FastConnect Data

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::{AppConfig, Transport};
use crate::middleware::ApiKeyMiddleware;
use crate::services::fc_data::{FcDataClient, MarketDataApi};
use crate::services::{MarketDataService, McpServer};

/// 应用程序入口
///
/// 根据配置以 HTTP 或 stdio 方式启动 MCP 服务
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, notes) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    for note in &notes {
        log::info!("{}", note);
    }

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        log::error!("缺少上游认证信息，请设置环境变量: {}", missing.join(", "));
        std::process::exit(1);
    }

    let client = FcDataClient::new(config.fc_data.clone(), &config.api)?;
    let api: Arc<dyn MarketDataApi> = Arc::new(client);
    let service = MarketDataService::new(api);
    let server = McpServer::new(service.clone());

    log::info!("启动 SSI 股票行情 MCP 服务，上游地址 {}", config.fc_data.url);

    if config.server.transport == Transport::Stdio {
        return server.serve_stdio().await;
    }

    if config.api.api_key.is_empty() {
        log::warn!("未设置 API_KEY，HTTP 接口不做认证");
    }

    let bind_addr = config.bind_addr();
    log::info!("HTTP 服务监听 {}", bind_addr);

    let api_key = config.api.api_key.clone();
    let service = web::Data::new(service);
    let server = web::Data::new(server);

    let mut http = HttpServer::new(move || {
        App::new()
            .wrap(ApiKeyMiddleware::new(api_key.clone())) // API Key 认证
            .wrap(Logger::default()) // 添加请求日志中间件
            .app_data(service.clone())
            .app_data(server.clone())
            .configure(handlers::config) // 配置路由
    });
    if config.server.workers > 0 {
        http = http.workers(config.server.workers);
    }

    http.bind(bind_addr)?.run().await?;
    Ok(())
}
