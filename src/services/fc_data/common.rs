//! SSI FastConnect Data 接口常量和请求参数映射

use crate::models::{
    DailyIndexRequest, DailyOhlcRequest, DailyStockPriceRequest, IndexComponentsRequest,
    IndexListRequest, IntradayOhlcRequest, SecuritiesDetailsRequest, SecuritiesRequest,
};

// ==================== FastConnect Data API 常量 ====================

/// 获取访问令牌
pub const ACCESS_TOKEN_PATH: &str = "api/v2/Market/AccessToken";
/// 证券列表
pub const SECURITIES_PATH: &str = "api/v2/Market/Securities";
/// 证券详情
pub const SECURITIES_DETAILS_PATH: &str = "api/v2/Market/SecuritiesDetails";
/// 指数成分股
pub const INDEX_COMPONENTS_PATH: &str = "api/v2/Market/IndexComponents";
/// 指数列表
pub const INDEX_LIST_PATH: &str = "api/v2/Market/IndexList";
/// 日K线
pub const DAILY_OHLC_PATH: &str = "api/v2/Market/DailyOhlc";
/// 分时K线
pub const INTRADAY_OHLC_PATH: &str = "api/v2/Market/IntradayOhlc";
/// 指数日数据
pub const DAILY_INDEX_PATH: &str = "api/v2/Market/DailyIndex";
/// 股票日价格
pub const DAILY_STOCK_PRICE_PATH: &str = "api/v2/Market/DailyStockPrice";

/// 查询参数统一前缀
const QUERY_PREFIX: &str = "lookupRequest.";

/// 可以发送到 FastConnect Data 的查询请求
pub trait LookupRequest {
    /// 相对于服务地址的接口路径
    const PATH: &'static str;

    /// 不带前缀的查询参数
    fn params(&self) -> Vec<(&'static str, String)>;

    /// 带 `lookupRequest.` 前缀的查询参数
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.params()
            .into_iter()
            .map(|(key, value)| (format!("{}{}", QUERY_PREFIX, key), value))
            .collect()
    }
}

fn paging(page: u32, size: u32) -> [(&'static str, String); 2] {
    [("pageIndex", page.to_string()), ("pageSize", size.to_string())]
}

impl LookupRequest for SecuritiesRequest {
    const PATH: &'static str = SECURITIES_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("market", self.market.to_string())];
        params.extend(paging(self.page, self.size));
        params
    }
}

impl LookupRequest for SecuritiesDetailsRequest {
    const PATH: &'static str = SECURITIES_DETAILS_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("market", self.market.to_string()),
            ("symbol", self.symbol.clone()),
        ];
        params.extend(paging(self.page, self.size));
        params
    }
}

impl LookupRequest for IndexComponentsRequest {
    const PATH: &'static str = INDEX_COMPONENTS_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("indexCode", self.index_code.clone())];
        params.extend(paging(self.page, self.size));
        params
    }
}

impl LookupRequest for IndexListRequest {
    const PATH: &'static str = INDEX_LIST_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("exchange", self.exchange.clone())];
        params.extend(paging(self.page, self.size));
        params
    }
}

impl LookupRequest for DailyOhlcRequest {
    const PATH: &'static str = DAILY_OHLC_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("fromDate", self.range.from_date.clone()),
            ("toDate", self.range.to_date.clone()),
        ];
        params.extend(paging(self.page, self.size));
        params.push(("ascending", self.ascending.to_string()));
        params
    }
}

impl LookupRequest for IntradayOhlcRequest {
    const PATH: &'static str = INTRADAY_OHLC_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("fromDate", self.range.from_date.clone()),
            ("toDate", self.range.to_date.clone()),
        ];
        params.extend(paging(self.page, self.size));
        params.push(("ascending", self.ascending.to_string()));
        // 上游接口的参数名拼写如此
        params.push(("resollution", self.interval.to_string()));
        params
    }
}

impl LookupRequest for DailyIndexRequest {
    const PATH: &'static str = DAILY_INDEX_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("requestId", self.channel_id.clone()),
            ("indexId", self.index_id.clone()),
            ("fromDate", self.range.from_date.clone()),
            ("toDate", self.range.to_date.clone()),
        ];
        params.extend(paging(self.page, self.size));
        params.push(("orderBy", self.order_by.clone()));
        params.push(("order", self.order.clone()));
        params
    }
}

impl LookupRequest for DailyStockPriceRequest {
    const PATH: &'static str = DAILY_STOCK_PRICE_PATH;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("fromDate", self.range.from_date.clone()),
            ("toDate", self.range.to_date.clone()),
        ];
        params.extend(paging(self.page, self.size));
        params.push(("market", self.market.clone()));
        params
    }
}
