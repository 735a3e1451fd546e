//! 行情数据服务
//!
//! 每个工具的处理流程相同：参数校验 → 上游请求 → 响应规范化。
//! 校验失败时不会发出任何上游请求；错误原样返回给调用方。

use std::sync::Arc;

use serde_json::Value;

use crate::error::ToolError;
use crate::models::{
    DailyIndexParams, DailyOhlcParams, IndexComponentsParams, IndexListParams,
    IntradayOhlcParams, SecuritiesDetailsParams, SecuritiesListParams, StockPriceParams,
};
use crate::services::fc_data::MarketDataApi;
use crate::services::normalizer::{normalize, Operation};
use crate::services::validator;

/// 行情数据服务，持有进程内唯一的上游客户端
#[derive(Clone)]
pub struct MarketDataService {
    api: Arc<dyn MarketDataApi>,
}

impl MarketDataService {
    pub fn new(api: Arc<dyn MarketDataApi>) -> Self {
        Self { api }
    }

    /// 获取指定市场的证券列表
    pub async fn get_securities_list(&self, params: SecuritiesListParams) -> Result<Value, ToolError> {
        let request = validator::securities_list(&params)?;
        let response = self.api.securities(&request).await?;
        normalize(Operation::SecuritiesList, response)
    }

    /// 获取单只证券的详细信息
    pub async fn get_securities_details(
        &self,
        params: SecuritiesDetailsParams,
    ) -> Result<Value, ToolError> {
        let request = validator::securities_details(&params)?;
        let response = self.api.securities_details(&request).await?;
        normalize(Operation::SecuritiesDetails, response)
    }

    /// 获取指数成分股
    pub async fn get_index_components(
        &self,
        params: IndexComponentsParams,
    ) -> Result<Value, ToolError> {
        let request = validator::index_components(&params)?;
        let response = self.api.index_components(&request).await?;
        normalize(Operation::IndexComponents, response)
    }

    /// 获取交易所的指数列表
    pub async fn get_index_list(&self, params: IndexListParams) -> Result<Value, ToolError> {
        let request = validator::index_list(&params)?;
        let response = self.api.index_list(&request).await?;
        normalize(Operation::IndexList, response)
    }

    pub async fn get_daily_ohlc(&self, params: DailyOhlcParams) -> Result<Value, ToolError> {
        let request = validator::daily_ohlc(&params)?;
        let response = self.api.daily_ohlc(&request).await?;
        normalize(Operation::DailyOhlc, response)
    }

    pub async fn get_intraday_ohlc(&self, params: IntradayOhlcParams) -> Result<Value, ToolError> {
        let request = validator::intraday_ohlc(&params)?;
        let response = self.api.intraday_ohlc(&request).await?;
        normalize(Operation::IntradayOhlc, response)
    }

    /// 获取指数每日交易汇总
    pub async fn get_daily_index(&self, params: DailyIndexParams) -> Result<Value, ToolError> {
        let request = validator::daily_index(&params)?;
        let response = self.api.daily_index(&request).await?;
        normalize(Operation::DailyIndex, response)
    }

    /// 获取股票每日价格、成交及外资数据
    pub async fn get_stock_price(&self, params: StockPriceParams) -> Result<Value, ToolError> {
        let request = validator::stock_price(&params)?;
        let response = self.api.daily_stock_price(&request).await?;
        normalize(Operation::StockPrice, response)
    }
}
