//! 行情数据模型
//!
//! 定义工具调用参数和经过校验的上游请求描述。
//! 参数结构体由工具调用的 JSON 参数反序列化而来，缺省值与工具说明一致。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 证券市场代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// 胡志明市证券交易所
    Hose,
    /// 河内证券交易所
    Hnx,
    /// 未上市公众公司市场
    Upcom,
    /// 衍生品市场
    Der,
}

impl Market {
    pub const ALL: [Market; 4] = [Market::Hose, Market::Hnx, Market::Upcom, Market::Der];

    pub fn code(&self) -> &'static str {
        match self {
            Market::Hose => "HOSE",
            Market::Hnx => "HNX",
            Market::Upcom => "UPCOM",
            Market::Der => "DER",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Market {
    type Err = ();

    /// 市场代码区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::ALL
            .into_iter()
            .find(|m| m.code() == s)
            .ok_or(())
    }
}

// 默认值函数
fn default_page() -> u32 { 1 }
fn default_size() -> u32 { 100 }
fn default_true() -> bool { true }
fn default_interval() -> u32 { 1 }
fn default_component_index() -> String { "vn100".to_string() }
fn default_index_exchange() -> String { "hnx".to_string() }
fn default_channel_id() -> String { "123".to_string() }
fn default_daily_index() -> String { "VN100".to_string() }
fn default_price_exchange() -> String { "hose".to_string() }

// ==================== 工具参数 ====================

/// get_securities_list 参数
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritiesListParams {
    /// 市场代码（HOSE/HNX/UPCOM/DER）
    pub market: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

/// get_securities_details 参数
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritiesDetailsParams {
    pub market: Option<String>,
    /// 证券代码
    pub symbol: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

/// get_index_components 参数
#[derive(Debug, Clone, Deserialize)]
pub struct IndexComponentsParams {
    /// 指数代码
    #[serde(default = "default_component_index")]
    pub index: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

/// get_index_list 参数
#[derive(Debug, Clone, Deserialize)]
pub struct IndexListParams {
    /// 交易所代码（hnx, hose）
    #[serde(default = "default_index_exchange")]
    pub exchange: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

/// get_daily_ohlc 参数
#[derive(Debug, Clone, Deserialize)]
pub struct DailyOhlcParams {
    pub symbol: Option<String>,
    /// 开始日期（DD/MM/YYYY）
    pub from_date: Option<String>,
    /// 结束日期（DD/MM/YYYY）
    pub to_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    /// 是否按日期升序
    #[serde(default = "default_true")]
    pub ascending: bool,
}

/// get_intraday_ohlc 参数
#[derive(Debug, Clone, Deserialize)]
pub struct IntradayOhlcParams {
    pub symbol: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_true")]
    pub ascending: bool,
    /// K线周期（分钟）
    #[serde(default = "default_interval")]
    pub interval: u32,
}

/// get_daily_index 参数
#[derive(Debug, Clone, Deserialize)]
pub struct DailyIndexParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    #[serde(default = "default_daily_index")]
    pub index: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

/// get_stock_price 参数
#[derive(Debug, Clone, Deserialize)]
pub struct StockPriceParams {
    pub symbol: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_price_exchange")]
    pub exchange: String,
}

// ==================== 上游请求描述 ====================
//
// 只能由校验器构造，字段均已通过必填和枚举检查。

#[derive(Debug, Clone, PartialEq)]
pub struct SecuritiesRequest {
    pub market: Market,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecuritiesDetailsRequest {
    pub market: Market,
    pub symbol: String,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexComponentsRequest {
    pub index_code: String,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexListRequest {
    pub exchange: String,
    pub page: u32,
    pub size: u32,
}

/// 日期区间（DD/MM/YYYY，原样透传给上游）
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub from_date: String,
    pub to_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOhlcRequest {
    pub symbol: String,
    pub range: DateRange,
    pub page: u32,
    pub size: u32,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntradayOhlcRequest {
    pub symbol: String,
    pub range: DateRange,
    pub page: u32,
    pub size: u32,
    pub ascending: bool,
    pub interval: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyIndexRequest {
    /// 请求通道 ID
    pub channel_id: String,
    pub index_id: String,
    pub range: DateRange,
    pub page: u32,
    pub size: u32,
    /// 排序字段，为空时由上游决定
    pub order_by: String,
    pub order: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStockPriceRequest {
    pub symbol: String,
    pub range: DateRange,
    pub page: u32,
    pub size: u32,
    pub market: String,
}
