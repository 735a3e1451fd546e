//! 工具注册表
//!
//! 定义对外暴露的工具名称、说明和参数 Schema，并按名称分发调用。

use log::info;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::ToolError;
use crate::models::ToolDescriptor;
use crate::services::market_service::MarketDataService;

pub const GET_SECURITIES_LIST: &str = "get_securities_list";
pub const GET_SECURITIES_DETAILS: &str = "get_securities_details";
pub const GET_INDEX_COMPONENTS: &str = "get_index_components";
pub const GET_INDEX_LIST: &str = "get_index_list";
pub const GET_DAILY_OHLC: &str = "get_daily_ohlc";
pub const GET_INTRADAY_OHLC: &str = "get_intraday_ohlc";
pub const GET_DAILY_INDEX: &str = "get_daily_index";
pub const GET_STOCK_PRICE: &str = "get_stock_price";

fn page_schema() -> Value {
    json!({ "type": "integer", "minimum": 1, "default": 1, "description": "Page number for pagination" })
}

fn size_schema() -> Value {
    json!({ "type": "integer", "minimum": 1, "default": 100, "description": "Number of records per page" })
}

fn market_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["HOSE", "HNX", "UPCOM", "DER"],
        "description": "Market code (HOSE/HNX/UPCOM/DER)"
    })
}

fn date_schema(description: &str) -> Value {
    json!({ "type": "string", "description": format!("{} in format DD/MM/YYYY", description) })
}

/// 组装参数 Schema，page/size 所有工具共有
fn object_schema(mut properties: Map<String, Value>, required: &[&str]) -> Value {
    properties.insert("page".to_string(), page_schema());
    properties.insert("size".to_string(), size_schema());
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn props(entries: Vec<(&str, Value)>) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn descriptor(name: &str, description: &str, input_schema: Value) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// 所有可用工具
pub fn list_tools() -> Vec<ToolDescriptor> {
    let symbol = json!({ "type": "string", "description": "Security symbol/ticker" });
    let ascending = json!({
        "type": "boolean",
        "default": true,
        "description": "Sort data in ascending order by date"
    });

    vec![
        descriptor(
            GET_SECURITIES_LIST,
            "Get list of securities from a specific market (HOSE/HNX/UPCOM/DER)",
            object_schema(props(vec![("market", market_schema())]), &["market"]),
        ),
        descriptor(
            GET_SECURITIES_DETAILS,
            "Get detailed information about a specific security",
            object_schema(
                props(vec![("market", market_schema()), ("symbol", symbol.clone())]),
                &["market", "symbol"],
            ),
        ),
        descriptor(
            GET_INDEX_COMPONENTS,
            "Get components of a specific index",
            object_schema(
                props(vec![(
                    "index",
                    json!({ "type": "string", "default": "vn100", "description": "Index code" }),
                )]),
                &[],
            ),
        ),
        descriptor(
            GET_INDEX_LIST,
            "Get list of indices for a specific exchange",
            object_schema(
                props(vec![(
                    "exchange",
                    json!({ "type": "string", "default": "hnx", "description": "Exchange code (hnx, hose)" }),
                )]),
                &[],
            ),
        ),
        descriptor(
            GET_DAILY_OHLC,
            "Get daily OHLC data for a specific symbol",
            object_schema(
                props(vec![
                    ("symbol", symbol.clone()),
                    ("from_date", date_schema("Start date")),
                    ("to_date", date_schema("End date")),
                    ("ascending", ascending.clone()),
                ]),
                &["symbol", "from_date", "to_date"],
            ),
        ),
        descriptor(
            GET_INTRADAY_OHLC,
            "Get intraday OHLC data for a specific symbol",
            object_schema(
                props(vec![
                    ("symbol", symbol.clone()),
                    ("from_date", date_schema("Start date")),
                    ("to_date", date_schema("End date")),
                    ("ascending", ascending),
                    (
                        "interval",
                        json!({ "type": "integer", "minimum": 1, "default": 1, "description": "Time interval in minutes" }),
                    ),
                ]),
                &["symbol", "from_date", "to_date"],
            ),
        ),
        descriptor(
            GET_DAILY_INDEX,
            "Get daily index data",
            object_schema(
                props(vec![
                    ("from_date", date_schema("Start date")),
                    ("to_date", date_schema("End date")),
                    (
                        "channel_id",
                        json!({ "type": "string", "default": "123", "description": "Channel ID" }),
                    ),
                    (
                        "index",
                        json!({ "type": "string", "default": "VN100", "description": "Index code" }),
                    ),
                ]),
                &["from_date", "to_date"],
            ),
        ),
        descriptor(
            GET_STOCK_PRICE,
            "Get daily stock price data( include volume, value, foreign buy/sell volume, foreign buy/sell value, total buy/sell volume, total buy/sell value) for a specific symbol",
            object_schema(
                props(vec![
                    ("symbol", symbol),
                    ("from_date", date_schema("Start date")),
                    ("to_date", date_schema("End date")),
                    (
                        "exchange",
                        json!({ "type": "string", "default": "hose", "description": "Exchange code (hose, hnx)" }),
                    ),
                ]),
                &["symbol", "from_date", "to_date"],
            ),
        ),
    ]
}

/// 按名称查找工具描述
pub fn get_tool(name: &str) -> Option<ToolDescriptor> {
    list_tools().into_iter().find(|t| t.name == name)
}

/// 将 JSON 参数解析为工具参数，null 视为空对象
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_argument(format!("Invalid arguments: {}", e)))
}

/// 调用指定工具
pub async fn call_tool(
    service: &MarketDataService,
    name: &str,
    arguments: Value,
) -> Result<Value, ToolError> {
    info!("调用工具 {}", name);

    match name {
        GET_SECURITIES_LIST => service.get_securities_list(parse_args(arguments)?).await,
        GET_SECURITIES_DETAILS => service.get_securities_details(parse_args(arguments)?).await,
        GET_INDEX_COMPONENTS => service.get_index_components(parse_args(arguments)?).await,
        GET_INDEX_LIST => service.get_index_list(parse_args(arguments)?).await,
        GET_DAILY_OHLC => service.get_daily_ohlc(parse_args(arguments)?).await,
        GET_INTRADAY_OHLC => service.get_intraday_ohlc(parse_args(arguments)?).await,
        GET_DAILY_INDEX => service.get_daily_index(parse_args(arguments)?).await,
        GET_STOCK_PRICE => service.get_stock_price(parse_args(arguments)?).await,
        _ => Err(ToolError::UnknownTool(name.to_string())),
    }
}
