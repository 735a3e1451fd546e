//! 各接口的记录字段表
//!
//! 每张表列出记录必须具备的字段、缺省值类型以及是否需要数值转换。
//! 证券列表、证券详情、指数成分的原始记录不做逐字段修复。

use serde_json::{json, Value};

/// 字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 字符串，缺省为 ""
    Text,
    /// 整数（成交量、笔数、家数），字符串会被解析，缺省为 0
    Integer,
    /// 浮点数（价格、金额、涨跌幅），字符串会被解析，缺省为 0
    Float,
    /// 缺失或 null 时补 0，其余原样保留
    Opaque,
}

impl FieldKind {
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Integer | FieldKind::Float | FieldKind::Opaque => json!(0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text }
}

const fn int(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Integer }
}

const fn float(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Float }
}

const fn opaque(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Opaque }
}

/// `data` 字段的容器形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `data` 为记录数组
    List,
    /// `data` 为对象，记录数组位于 `list_field`
    Nested { list_field: &'static str },
}

/// 接口特有的跨字段检查
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHook {
    /// 以 IndexComponent 的实际长度为准修正 TotalSymbolNo
    IndexComponentCount,
    /// Exchange 不是 HOSE/HNX 时记录警告，不修改
    ExchangeFlag,
}

#[derive(Debug)]
pub struct Schema {
    /// 日志中使用的数据名称
    pub label: &'static str,
    pub container: Container,
    pub fields: &'static [FieldSpec],
    pub hooks: &'static [RecordHook],
}

/// 需要规范化的接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SecuritiesList,
    SecuritiesDetails,
    IndexComponents,
    IndexList,
    DailyOhlc,
    IntradayOhlc,
    DailyIndex,
    StockPrice,
}

impl Operation {
    pub fn schema(&self) -> &'static Schema {
        match self {
            Operation::SecuritiesList => &SECURITIES_LIST,
            Operation::SecuritiesDetails => &SECURITIES_DETAILS,
            Operation::IndexComponents => &INDEX_COMPONENTS,
            Operation::IndexList => &INDEX_LIST,
            Operation::DailyOhlc => &DAILY_OHLC,
            Operation::IntradayOhlc => &INTRADAY_OHLC,
            Operation::DailyIndex => &DAILY_INDEX,
            Operation::StockPrice => &STOCK_PRICE,
        }
    }
}

/// 证券详情记录所在字段
pub const REPEATED_INFO_LIST: &str = "repeatedinfoList";

static SECURITIES_LIST: Schema = Schema {
    label: "证券列表",
    container: Container::List,
    fields: &[],
    hooks: &[],
};

static SECURITIES_DETAILS: Schema = Schema {
    label: "证券详情",
    container: Container::Nested { list_field: REPEATED_INFO_LIST },
    fields: &[],
    hooks: &[],
};

static INDEX_COMPONENTS: Schema = Schema {
    label: "指数成分",
    container: Container::List,
    fields: &[],
    hooks: &[RecordHook::IndexComponentCount],
};

static INDEX_LIST: Schema = Schema {
    label: "指数列表",
    container: Container::List,
    fields: &[text("IndexCode"), text("IndexName"), text("Exchange")],
    hooks: &[RecordHook::ExchangeFlag],
};

static DAILY_OHLC: Schema = Schema {
    label: "日K线数据",
    container: Container::List,
    fields: &[
        text("Symbol"),
        float("Open"),
        float("High"),
        float("Low"),
        float("Close"),
        int("Volume"),
        float("Value"),
    ],
    hooks: &[],
};

static INTRADAY_OHLC: Schema = Schema {
    label: "分时K线数据",
    container: Container::List,
    fields: &[
        text("Symbol"),
        float("Open"),
        float("High"),
        float("Low"),
        float("Close"),
        int("Volume"),
        float("Value"),
        opaque("Time"),
        text("TradingDate"),
    ],
    hooks: &[],
};

static DAILY_INDEX: Schema = Schema {
    label: "指数日数据",
    container: Container::List,
    fields: &[
        text("Indexcode"),
        text("IndexName"),
        float("IndexValue"),
        float("Change"),
        float("RatioChange"),
        int("TotalTrade"),
        int("Totalmatchvol"),
        float("Totalmatchval"),
        int("Advances"),
        int("Nochanges"),
        int("Declines"),
        int("Ceiling"),
        int("Floor"),
        int("Totaldealvol"),
        float("Totaldealval"),
        int("Totalvol"),
        float("Totalval"),
        text("TradingDate"),
        opaque("Time"),
    ],
    hooks: &[],
};

// 上游以字符串返回全部价格字段，保持字符串形式
static STOCK_PRICE: Schema = Schema {
    label: "股票日价格数据",
    container: Container::List,
    fields: &[
        text("Symbol"),
        text("Tradingdate"),
        text("Time"),
        text("Pricechange"),
        text("Perpricechange"),
        text("Ceilingprice"),
        text("Floorprice"),
        text("Refprice"),
        text("Openprice"),
        text("Highestprice"),
        text("Lowestprice"),
        text("Closeprice"),
        text("Averageprice"),
        text("Closepriceadjusted"),
        text("Totalmatchvol"),
        text("Totalmatchval"),
        text("Totaldealval"),
        text("Totaldealvol"),
        text("Foreignbuyvoltotal"),
        text("Foreigncurrentroom"),
        text("Foreignsellvoltotal"),
        text("Foreignbuyvaltotal"),
        text("Foreignsellvaltotal"),
        text("Totalbuytrade"),
        text("Totalbuytradevol"),
        text("Totalselltrade"),
        text("Totalselltradevol"),
        text("Netforeivol"),
        text("Netforeignval"),
        text("Totaltradedvol"),
        text("Totaltradedvalue"),
    ],
    hooks: &[],
};
