//! 上游响应规范化
//!
//! 所有接口共用同一套修复流程，差异由 [`schema`] 中的字段表描述：
//!
//! 1. 响应必须是 JSON 对象，否则返回 [`ToolError::InvalidResponseFormat`]
//! 2. `status` 不为 200 时只记录警告，原样保留
//! 3. `data` 缺失或容器类型不对时替换为空容器
//! 4. 逐条记录补齐字段、转换数值字符串、执行跨字段检查
//!
//! 除第 1 步外，所有异常都会被修复并记录 warn 日志，不会返回错误。
//! 规范化会消耗传入的响应，调用方拿到的是修复后的同一份数据。

pub mod schema;

use log::warn;
use serde_json::map::Entry;
use serde_json::{json, Map, Number, Value};

use crate::error::ToolError;
use schema::{Container, FieldKind, FieldSpec, RecordHook, Schema};

pub use schema::Operation;

const DATA: &str = "data";
const SUCCESS_STATUS: i64 = 200;
const LISTED_EXCHANGES: [&str; 2] = ["HOSE", "HNX"];

/// 规范化一次上游响应
pub fn normalize(operation: Operation, response: Value) -> Result<Value, ToolError> {
    let schema = operation.schema();
    let Value::Object(mut body) = response else {
        return Err(ToolError::InvalidResponseFormat);
    };

    observe_status(&body);

    match schema.container {
        Container::List => {
            let slot = body.entry(DATA).or_insert(Value::Null);
            let records = take_list(slot.take());
            *slot = Value::Array(repair_records(schema, records));
        }
        Container::Nested { list_field } => {
            let had_data = body.contains_key(DATA);
            let slot = body.entry(DATA).or_insert(Value::Null);
            let mut data = nested_container(schema, slot.take(), had_data, list_field);
            let inner = data.entry(list_field).or_insert(Value::Null);
            let records = take_list(inner.take());
            *inner = Value::Array(repair_records(schema, records));
            *slot = Value::Object(data);
        }
    }

    Ok(Value::Object(body))
}

fn observe_status(body: &Map<String, Value>) {
    match body.get("status") {
        Some(status) if status.as_i64() == Some(SUCCESS_STATUS) => {}
        Some(status) => warn!("上游返回非成功状态: {}", status),
        None => warn!("上游响应缺少 status 字段"),
    }
}

fn take_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(list) => list,
        _ => Vec::new(),
    }
}

/// 修复嵌套容器；非空数组会被包装保留而不是丢弃
fn nested_container(
    schema: &Schema,
    value: Value,
    had_data: bool,
    list_field: &'static str,
) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ if !had_data => Map::new(),
        Value::Array(list) if !list.is_empty() => {
            warn!("{}的 data 字段不是对象，已包装为 {}", schema.label, list_field);
            let mut map = Map::new();
            map.insert(list_field.to_string(), Value::Array(list));
            map
        }
        other => {
            warn!("{}的 data 字段不是对象: {}", schema.label, other);
            Map::new()
        }
    }
}

fn repair_records(schema: &Schema, records: Vec<Value>) -> Vec<Value> {
    // 没有逐条修复规则的接口原样透传
    if schema.fields.is_empty() && schema.hooks.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(mut map) => {
                repair_record(schema, &mut map);
                Some(Value::Object(map))
            }
            other => {
                warn!("{}中存在非对象记录，已丢弃: {}", schema.label, other);
                None
            }
        })
        .collect()
}

fn repair_record(schema: &Schema, record: &mut Map<String, Value>) {
    for field in schema.fields {
        repair_field(schema.label, field, record);
    }
    for hook in schema.hooks {
        match hook {
            RecordHook::IndexComponentCount => reconcile_component_count(record),
            RecordHook::ExchangeFlag => flag_exchange(record),
        }
    }
}

fn repair_field(label: &str, field: &FieldSpec, record: &mut Map<String, Value>) {
    let mut entry = match record.entry(field.name) {
        Entry::Occupied(entry) => entry,
        Entry::Vacant(entry) => {
            warn!("{}缺少字段 {}，使用默认值", label, field.name);
            entry.insert(field.kind.default_value());
            return;
        }
    };
    let value = entry.get_mut();

    if value.is_null() {
        warn!("{}字段 {} 为 null，使用默认值", label, field.name);
        *value = field.kind.default_value();
        return;
    }

    match coerce(field.kind, value) {
        Coercion::Keep => {}
        Coercion::Replace(repaired) => *value = repaired,
        Coercion::Invalid => {
            warn!("{}字段 {} 的值无效: {}", label, field.name, value);
            *value = field.kind.default_value();
        }
    }
}

#[derive(Debug, PartialEq)]
enum Coercion {
    Keep,
    Replace(Value),
    Invalid,
}

/// 按字段类型检查非 null 值
fn coerce(kind: FieldKind, value: &Value) -> Coercion {
    match (kind, value) {
        (FieldKind::Opaque, _) => Coercion::Keep,
        (FieldKind::Text, Value::Array(_) | Value::Object(_)) => Coercion::Invalid,
        (FieldKind::Text, _) => Coercion::Keep,
        (FieldKind::Integer | FieldKind::Float, Value::Number(_)) => Coercion::Keep,
        (FieldKind::Integer, Value::String(s)) => parse_integer(s)
            .map(|n| Coercion::Replace(json!(n)))
            .unwrap_or(Coercion::Invalid),
        (FieldKind::Float, Value::String(s)) => parse_float(s)
            .map(|n| Coercion::Replace(Value::Number(n)))
            .unwrap_or(Coercion::Invalid),
        (FieldKind::Integer | FieldKind::Float, _) => Coercion::Invalid,
    }
}

/// 解析整数字符串，如 "100"；"10.5" 视为无效
pub fn parse_integer(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// 解析浮点数字符串，NaN 和无穷大视为无效
pub fn parse_float(s: &str) -> Option<Number> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

fn reconcile_component_count(record: &mut Map<String, Value>) {
    let count = match record.get("IndexComponent").and_then(Value::as_array) {
        Some(components) => components.len(),
        None => {
            record.insert("IndexComponent".to_string(), Value::Array(Vec::new()));
            0
        }
    };

    let declared = record
        .get("TotalSymbolNo")
        .filter(|total| total.as_f64() != Some(count as f64))
        .cloned();
    if let Some(declared) = declared {
        warn!(
            "TotalSymbolNo ({}) 与实际成分数量 ({}) 不一致，已修正",
            declared, count
        );
        record.insert("TotalSymbolNo".to_string(), json!(count));
    }
}

fn flag_exchange(record: &Map<String, Value>) {
    match record.get("Exchange") {
        Some(Value::String(exchange)) if LISTED_EXCHANGES.contains(&exchange.as_str()) => {}
        Some(exchange) => warn!("Exchange 取值异常: {}", exchange),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_record(response: &Value) -> &Map<String, Value> {
        response["data"][0].as_object().unwrap()
    }

    // ==================== 通用流程 ====================

    #[test]
    fn test_missing_data_becomes_empty_list() {
        let result = normalize(Operation::SecuritiesList, json!({ "status": 200 })).unwrap();
        assert_eq!(result["data"], json!([]));
        assert_eq!(result["status"], json!(200));
    }

    #[test]
    fn test_wrong_container_type_becomes_empty_list() {
        for data in [json!("oops"), json!({ "a": 1 }), json!(null), json!(42)] {
            let result = normalize(
                Operation::IndexList,
                json!({ "status": 200, "data": data }),
            )
            .unwrap();
            assert_eq!(result["data"], json!([]));
        }
    }

    #[test]
    fn test_non_success_status_passes_through() {
        let result = normalize(Operation::DailyOhlc, json!({ "status": 404, "data": [] })).unwrap();
        assert_eq!(result["status"], json!(404));
        assert_eq!(result["data"], json!([]));
    }

    #[test]
    fn test_non_mapping_response_is_rejected_for_every_operation() {
        let ops = [
            Operation::SecuritiesList,
            Operation::SecuritiesDetails,
            Operation::IndexComponents,
            Operation::IndexList,
            Operation::DailyOhlc,
            Operation::IntradayOhlc,
            Operation::DailyIndex,
            Operation::StockPrice,
        ];
        for op in ops {
            for bad in [json!([]), json!("text"), json!(null), json!(1)] {
                let err = normalize(op, bad).unwrap_err();
                assert!(matches!(err, ToolError::InvalidResponseFormat), "{:?}", op);
            }
        }
    }

    #[test]
    fn test_envelope_fields_are_preserved() {
        let response = json!({
            "message": "Success",
            "status": 200,
            "totalRecord": 1,
            "data": [{ "market": "HOSE", "symbol": "SSI", "StockName": "CTCP Chứng khoán SSI" }]
        });
        let result = normalize(Operation::SecuritiesList, response.clone()).unwrap();
        assert_eq!(result, response);
    }

    #[test]
    fn test_non_object_records_are_dropped() {
        let result = normalize(
            Operation::DailyOhlc,
            json!({ "status": 200, "data": [1, { "Symbol": "SSI" }, "x"] }),
        )
        .unwrap();
        let data = result["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["Symbol"], json!("SSI"));
    }

    #[test]
    fn test_records_pass_through_without_field_schema() {
        let result = normalize(
            Operation::SecuritiesList,
            json!({ "status": 200, "data": ["SSI", { "symbol": "VNM" }] }),
        )
        .unwrap();
        assert_eq!(result["data"], json!(["SSI", { "symbol": "VNM" }]));

        let result = normalize(
            Operation::SecuritiesDetails,
            json!({ "status": 200, "data": { "repeatedinfoList": [7, { "Symbol": "SSI" }] } }),
        )
        .unwrap();
        assert_eq!(result["data"]["repeatedinfoList"], json!([7, { "Symbol": "SSI" }]));
    }

    // ==================== 证券详情 ====================

    #[test]
    fn test_details_missing_data() {
        let result = normalize(Operation::SecuritiesDetails, json!({ "status": 200 })).unwrap();
        assert_eq!(result["data"], json!({ "repeatedinfoList": [] }));
    }

    #[test]
    fn test_details_list_is_salvaged() {
        let result = normalize(
            Operation::SecuritiesDetails,
            json!({ "status": 200, "data": [{ "Symbol": "SSI" }] }),
        )
        .unwrap();
        assert_eq!(
            result["data"],
            json!({ "repeatedinfoList": [{ "Symbol": "SSI" }] })
        );
    }

    #[test]
    fn test_details_empty_list_and_scalar_are_reset() {
        for data in [json!([]), json!("bad"), json!(null)] {
            let result = normalize(
                Operation::SecuritiesDetails,
                json!({ "status": 200, "data": data }),
            )
            .unwrap();
            assert_eq!(result["data"], json!({ "repeatedinfoList": [] }));
        }
    }

    #[test]
    fn test_details_repairs_inner_list_and_keeps_header() {
        let result = normalize(
            Operation::SecuritiesDetails,
            json!({
                "status": 200,
                "data": { "RType": "y", "ReportDate": "15/03/2024", "TotalNoSym": 1, "repeatedinfoList": "x" }
            }),
        )
        .unwrap();
        assert_eq!(result["data"]["RType"], json!("y"));
        assert_eq!(result["data"]["TotalNoSym"], json!(1));
        assert_eq!(result["data"]["repeatedinfoList"], json!([]));
    }

    // ==================== 指数 ====================

    #[test]
    fn test_index_component_count_is_overwritten() {
        let result = normalize(
            Operation::IndexComponents,
            json!({
                "status": 200,
                "data": [{
                    "IndexCode": "VN100",
                    "IndexComponent": [{ "Isin": "A" }, { "Isin": "B" }],
                    "TotalSymbolNo": 5
                }]
            }),
        )
        .unwrap();
        assert_eq!(first_record(&result)["TotalSymbolNo"], json!(2));
    }

    #[test]
    fn test_index_component_list_repaired() {
        let result = normalize(
            Operation::IndexComponents,
            json!({
                "status": 200,
                "data": [
                    { "IndexCode": "VN30", "TotalSymbolNo": "30" },
                    { "IndexCode": "HNX30", "IndexComponent": [{ "Isin": "A" }], "TotalSymbolNo": 1 },
                    { "IndexCode": "VNXALL", "IndexComponent": [] }
                ]
            }),
        )
        .unwrap();
        let data = result["data"].as_array().unwrap();
        assert_eq!(data[0]["IndexComponent"], json!([]));
        assert_eq!(data[0]["TotalSymbolNo"], json!(0));
        assert_eq!(data[1]["TotalSymbolNo"], json!(1));
        // 没有 TotalSymbolNo 时不补充
        assert!(data[2].get("TotalSymbolNo").is_none());
    }

    #[test]
    fn test_index_list_fields_defaulted_and_exchange_kept() {
        let result = normalize(
            Operation::IndexList,
            json!({ "status": 200, "data": [{ "IndexCode": "VN30", "Exchange": "UPCOM" }] }),
        )
        .unwrap();
        let record = first_record(&result);
        assert_eq!(record["IndexName"], json!(""));
        assert_eq!(record["Exchange"], json!("UPCOM"));
    }

    // ==================== K线 ====================

    #[test]
    fn test_daily_ohlc_coercion_and_defaults() {
        let result = normalize(
            Operation::DailyOhlc,
            json!({ "status": 200, "data": [{ "Symbol": "ABC", "Open": "10.5", "Volume": "100" }] }),
        )
        .unwrap();
        let record = first_record(&result);
        assert_eq!(record["Open"].as_f64(), Some(10.5));
        assert!(record["Open"].is_f64());
        assert_eq!(record["Volume"].as_i64(), Some(100));
        assert!(record["Volume"].is_i64());
        for field in ["High", "Low", "Close", "Value"] {
            assert_eq!(record[field], json!(0), "{}", field);
        }
        // 日K线不补 Time / TradingDate
        assert!(record.get("Time").is_none());
        assert!(record.get("TradingDate").is_none());
    }

    #[test]
    fn test_unparseable_numeric_strings_fall_back_to_zero() {
        let result = normalize(
            Operation::DailyOhlc,
            json!({ "status": 200, "data": [{
                "Symbol": "ABC",
                "Open": "abc",
                "High": "NaN",
                "Low": "",
                "Close": true,
                "Volume": "10.5",
                "Value": null
            }] }),
        )
        .unwrap();
        let record = first_record(&result);
        for field in ["Open", "High", "Low", "Close", "Volume", "Value"] {
            assert_eq!(record[field], json!(0), "{}", field);
        }
    }

    #[test]
    fn test_intraday_ohlc_time_is_not_coerced() {
        let result = normalize(
            Operation::IntradayOhlc,
            json!({ "status": 200, "data": [
                { "Symbol": "SSI", "Time": "09:15:00", "Close": "28.5" },
                { "Symbol": "SSI" }
            ] }),
        )
        .unwrap();
        let data = result["data"].as_array().unwrap();
        assert_eq!(data[0]["Time"], json!("09:15:00"));
        assert_eq!(data[0]["Close"].as_f64(), Some(28.5));
        assert_eq!(data[1]["Time"], json!(0));
        assert_eq!(data[1]["TradingDate"], json!(""));
    }

    // ==================== 指数日数据 / 股票日价格 ====================

    #[test]
    fn test_daily_index_integer_and_float_fields() {
        let result = normalize(
            Operation::DailyIndex,
            json!({ "status": 200, "data": [{
                "Indexcode": "VN100",
                "IndexValue": "1250.35",
                "Advances": "45",
                "Totalmatchval": "12345678.9",
                "Time": "15:00:00"
            }] }),
        )
        .unwrap();
        let record = first_record(&result);
        assert_eq!(record["IndexValue"].as_f64(), Some(1250.35));
        assert_eq!(record["Advances"].as_i64(), Some(45));
        assert_eq!(record["Totalmatchval"].as_f64(), Some(12345678.9));
        assert_eq!(record["Time"], json!("15:00:00"));
        assert_eq!(record["IndexName"], json!(""));
        assert_eq!(record["TradingDate"], json!(""));
        assert_eq!(record["Declines"], json!(0));
    }

    #[test]
    fn test_stock_price_fields_stay_strings() {
        let result = normalize(
            Operation::StockPrice,
            json!({ "status": 200, "data": [{
                "Symbol": "VNM",
                "Closeprice": "70500",
                "Openprice": null,
                "Totalmatchvol": 1200
            }] }),
        )
        .unwrap();
        let record = first_record(&result);
        assert_eq!(record.len(), 31);
        assert_eq!(record["Closeprice"], json!("70500"));
        assert_eq!(record["Openprice"], json!(""));
        assert_eq!(record["Totalmatchvol"], json!(1200));
        assert_eq!(record["Foreigncurrentroom"], json!(""));
    }

    // ==================== 幂等性 ====================

    #[test]
    fn test_normalization_is_idempotent() {
        let cases = [
            (Operation::DailyOhlc, json!({ "status": 200, "data": [{ "Open": "1.5", "Volume": "x" }] })),
            (Operation::IntradayOhlc, json!({ "status": 500, "data": [{ "Symbol": null }] })),
            (Operation::DailyIndex, json!({ "status": 200, "data": [{ "TotalTrade": "12" }] })),
            (Operation::StockPrice, json!({ "status": 200, "data": [{}] })),
            (Operation::IndexList, json!({ "status": 200, "data": [{ "Exchange": "HOSE" }] })),
            (Operation::IndexComponents, json!({ "data": [{ "TotalSymbolNo": 3 }] })),
            (Operation::SecuritiesDetails, json!({ "status": 200, "data": [{ "Isin": "X" }] })),
            (Operation::SecuritiesList, json!({ "status": 200, "data": "x" })),
        ];
        for (op, response) in cases {
            let once = normalize(op, response).unwrap();
            let twice = normalize(op, once.clone()).unwrap();
            assert_eq!(once, twice, "{:?}", op);
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_integer(" 42 "), Some(42));
        assert_eq!(parse_integer("4.2"), None);
        assert_eq!(parse_float("1e3").and_then(|n| n.as_f64()), Some(1000.0));
        assert!(parse_float("inf").is_none());
        assert!(parse_float("").is_none());
    }

    #[test]
    fn test_coerce_table() {
        assert_eq!(coerce(FieldKind::Text, &json!("a")), Coercion::Keep);
        assert_eq!(coerce(FieldKind::Text, &json!(12)), Coercion::Keep);
        assert_eq!(coerce(FieldKind::Text, &json!([1])), Coercion::Invalid);
        assert_eq!(coerce(FieldKind::Integer, &json!("7")), Coercion::Replace(json!(7)));
        assert_eq!(coerce(FieldKind::Integer, &json!({})), Coercion::Invalid);
        assert_eq!(coerce(FieldKind::Float, &json!(7)), Coercion::Keep);
        assert_eq!(coerce(FieldKind::Opaque, &json!("09:00")), Coercion::Keep);
    }
}
