//! SSI FastConnect Data HTTP 客户端
//!
//! 每次调用先用 consumerID / consumerSecret 换取访问令牌，再请求具体接口。
//! 令牌不做缓存，客户端本身不持有可变状态，可以在多个请求间共享。

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use url::Url;

use super::common::{LookupRequest, ACCESS_TOKEN_PATH};
use super::MarketDataApi;
use crate::config::{ApiConfig, FcDataConfig};
use crate::models::{
    DailyIndexRequest, DailyOhlcRequest, DailyStockPriceRequest, IndexComponentsRequest,
    IndexListRequest, IntradayOhlcRequest, SecuritiesDetailsRequest, SecuritiesRequest,
};

/// FastConnect Data 客户端
pub struct FcDataClient {
    /// HTTP 客户端
    client: Client,
    /// 服务地址，保证以 `/` 结尾
    base_url: Url,
    config: FcDataConfig,
}

impl FcDataClient {
    /// 创建客户端，进程启动时调用一次
    pub fn new(config: FcDataConfig, api: &ApiConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// 获取访问令牌
    async fn access_token(&self) -> Result<String> {
        let url = self.base_url.join(ACCESS_TOKEN_PATH)?;
        let body = json!({
            "consumerID": self.config.consumer_id,
            "consumerSecret": self.config.consumer_secret,
        });

        let response = self.client.post(url).json(&body).send().await?;
        let payload = read_json(response).await?;
        extract_access_token(&payload)
    }

    /// 发起一次查询请求，返回未经处理的 JSON
    async fn lookup<R: LookupRequest + Sync>(&self, request: &R) -> Result<Value> {
        let token = self.access_token().await?;
        let url = self.base_url.join(R::PATH)?;

        log::debug!("请求 FastConnect 接口: {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("{} {}", self.config.auth_type, token))
            .query(&request.query_pairs())
            .send()
            .await?;

        read_json(response).await
    }
}

#[async_trait]
impl MarketDataApi for FcDataClient {
    async fn securities(&self, request: &SecuritiesRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn securities_details(&self, request: &SecuritiesDetailsRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn index_components(&self, request: &IndexComponentsRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn index_list(&self, request: &IndexListRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn daily_ohlc(&self, request: &DailyOhlcRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn intraday_ohlc(&self, request: &IntradayOhlcRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn daily_index(&self, request: &DailyIndexRequest) -> Result<Value> {
        self.lookup(request).await
    }

    async fn daily_stock_price(&self, request: &DailyStockPriceRequest) -> Result<Value> {
        self.lookup(request).await
    }
}

/// 服务地址补齐结尾的 `/`，否则 `Url::join` 会丢掉最后一段路径
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).with_context(|| format!("invalid FastConnect Data URL: {}", raw))
}

/// 无论 HTTP 状态码如何都尝试解析响应体，业务状态由 `status` 字段表达
async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| anyhow!("upstream returned a non-JSON body (HTTP {}): {}", status, e))
}

fn extract_access_token(payload: &Value) -> Result<String> {
    if payload["status"].as_i64() != Some(200) {
        let message = payload["message"].as_str().unwrap_or("unknown error");
        return Err(anyhow!("authentication failed: {}", message));
    }
    payload["data"]["accessToken"]
        .as_str()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("authentication failed: access token missing from response"))
}
