//! 请求参数校验
//!
//! 在发起任何上游请求之前检查必填参数和枚举参数，
//! 校验通过后构造上游请求描述。

use crate::error::ToolError;
use crate::models::{
    DailyIndexParams, DailyIndexRequest, DailyOhlcParams, DailyOhlcRequest,
    DailyStockPriceRequest, DateRange, IndexComponentsParams, IndexComponentsRequest,
    IndexListParams, IndexListRequest, IntradayOhlcParams, IntradayOhlcRequest, Market,
    SecuritiesDetailsParams, SecuritiesDetailsRequest, SecuritiesListParams, SecuritiesRequest,
    StockPriceParams,
};

const INVALID_MARKET: &str = "Market must be one of: HOSE, HNX, UPCOM, DER";
const SYMBOL_DATES_REQUIRED: &str = "symbol, from_date, and to_date are required";
const DATES_REQUIRED: &str = "from_date and to_date are required";

/// 取出非空字符串参数
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn parse_market(market: &Option<String>) -> Result<Market, ToolError> {
    non_empty(market)
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| ToolError::invalid_argument(INVALID_MARKET))
}

/// 代码 + 日期区间三个参数必须同时存在
fn symbol_and_range(
    symbol: &Option<String>,
    from_date: &Option<String>,
    to_date: &Option<String>,
) -> Result<(String, DateRange), ToolError> {
    match (non_empty(symbol), date_range(from_date, to_date)) {
        (Some(symbol), Some(range)) => Ok((symbol.to_string(), range)),
        _ => Err(ToolError::invalid_argument(SYMBOL_DATES_REQUIRED)),
    }
}

fn date_range(from_date: &Option<String>, to_date: &Option<String>) -> Option<DateRange> {
    Some(DateRange {
        from_date: non_empty(from_date)?.to_string(),
        to_date: non_empty(to_date)?.to_string(),
    })
}

pub fn securities_list(params: &SecuritiesListParams) -> Result<SecuritiesRequest, ToolError> {
    Ok(SecuritiesRequest {
        market: parse_market(&params.market)?,
        page: params.page,
        size: params.size,
    })
}

pub fn securities_details(
    params: &SecuritiesDetailsParams,
) -> Result<SecuritiesDetailsRequest, ToolError> {
    let symbol = non_empty(&params.symbol)
        .ok_or_else(|| ToolError::invalid_argument("Symbol is required"))?;
    Ok(SecuritiesDetailsRequest {
        market: parse_market(&params.market)?,
        symbol: symbol.to_string(),
        page: params.page,
        size: params.size,
    })
}

pub fn index_components(
    params: &IndexComponentsParams,
) -> Result<IndexComponentsRequest, ToolError> {
    if params.index.is_empty() {
        return Err(ToolError::invalid_argument("Index code is required"));
    }
    Ok(IndexComponentsRequest {
        index_code: params.index.clone(),
        page: params.page,
        size: params.size,
    })
}

pub fn index_list(params: &IndexListParams) -> Result<IndexListRequest, ToolError> {
    if params.exchange.is_empty() {
        return Err(ToolError::invalid_argument("Exchange code is required"));
    }
    Ok(IndexListRequest {
        exchange: params.exchange.clone(),
        page: params.page,
        size: params.size,
    })
}

pub fn daily_ohlc(params: &DailyOhlcParams) -> Result<DailyOhlcRequest, ToolError> {
    let (symbol, range) = symbol_and_range(&params.symbol, &params.from_date, &params.to_date)?;
    Ok(DailyOhlcRequest {
        symbol,
        range,
        page: params.page,
        size: params.size,
        ascending: params.ascending,
    })
}

pub fn intraday_ohlc(params: &IntradayOhlcParams) -> Result<IntradayOhlcRequest, ToolError> {
    let (symbol, range) = symbol_and_range(&params.symbol, &params.from_date, &params.to_date)?;
    Ok(IntradayOhlcRequest {
        symbol,
        range,
        page: params.page,
        size: params.size,
        ascending: params.ascending,
        interval: params.interval,
    })
}

pub fn daily_index(params: &DailyIndexParams) -> Result<DailyIndexRequest, ToolError> {
    let range = date_range(&params.from_date, &params.to_date)
        .ok_or_else(|| ToolError::invalid_argument(DATES_REQUIRED))?;
    Ok(DailyIndexRequest {
        channel_id: params.channel_id.clone(),
        index_id: params.index.clone(),
        range,
        page: params.page,
        size: params.size,
        order_by: String::new(),
        order: String::new(),
    })
}

pub fn stock_price(params: &StockPriceParams) -> Result<DailyStockPriceRequest, ToolError> {
    let (symbol, range) = symbol_and_range(&params.symbol, &params.from_date, &params.to_date)?;
    Ok(DailyStockPriceRequest {
        symbol,
        range,
        page: params.page,
        size: params.size,
        market: params.exchange.clone(),
    })
}
