//! 上游行情数据接口
//!
//! [`MarketDataApi`] 描述每个接口的调用签名，生产环境使用 [`FcDataClient`]，
//! 测试中可以替换为任意实现。

mod client;
pub mod common;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{
    DailyIndexRequest, DailyOhlcRequest, DailyStockPriceRequest, IndexComponentsRequest,
    IndexListRequest, IntradayOhlcRequest, SecuritiesDetailsRequest, SecuritiesRequest,
};

pub use client::FcDataClient;

/// 上游行情接口
///
/// 每个方法发起一次请求并返回原始 JSON，不做重试，也不解释业务状态码。
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    async fn securities(&self, request: &SecuritiesRequest) -> Result<Value>;

    async fn securities_details(&self, request: &SecuritiesDetailsRequest) -> Result<Value>;

    async fn index_components(&self, request: &IndexComponentsRequest) -> Result<Value>;

    async fn index_list(&self, request: &IndexListRequest) -> Result<Value>;

    async fn daily_ohlc(&self, request: &DailyOhlcRequest) -> Result<Value>;

    async fn intraday_ohlc(&self, request: &IntradayOhlcRequest) -> Result<Value>;

    async fn daily_index(&self, request: &DailyIndexRequest) -> Result<Value>;

    async fn daily_stock_price(&self, request: &DailyStockPriceRequest) -> Result<Value>;
}
