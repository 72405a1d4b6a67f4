//! 股票数据模型
//!
//! 定义时间序列及相关查询结构

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StockError, StockResult};

/// 表单中可选的 Alpha Vantage 时间粒度（function 参数值, 显示名称）
pub const FUNCTIONS: &[(&str, &str)] = &[
    ("TIME_SERIES_DAILY", "Daily"),
    ("TIME_SERIES_WEEKLY", "Weekly"),
    ("TIME_SERIES_MONTHLY", "Monthly"),
    ("TIME_SERIES_WEEKLY_ADJUSTED", "Weekly Adjusted"),
    ("TIME_SERIES_MONTHLY_ADJUSTED", "Monthly Adjusted"),
];

/// 单日价格字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    /// 接口返回中的字段名
    pub fn key(self) -> &'static str {
        match self {
            Self::Open => "1. open",
            Self::High => "2. high",
            Self::Low => "3. low",
            Self::Close => "4. close",
        }
    }

    /// 图例名称
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
        }
    }
}

/// 时间序列中的一个数据点
///
/// 保留接口返回的原始字段，数值在读取时才转换
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    /// 日期（YYYY-MM-DD）
    pub date: String,
    /// 原始字段（"1. open" 等，值为字符串形式的数字）
    pub fields: Map<String, Value>,
}

impl TimeSeriesPoint {
    pub fn new(date: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            date: date.into(),
            fields,
        }
    }

    /// 读取价格字段，字符串或数字均可，缺失、非数值或非有限值（NaN、inf）返回错误
    pub fn price(&self, field: PriceField) -> StockResult<f64> {
        let invalid = |value: String| StockError::InvalidFieldValue {
            date: self.date.clone(),
            field: field.key().to_string(),
            value,
        };

        match self.fields.get(field.key()) {
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(s.clone())),
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(n.to_string())),
            Some(other) => Err(invalid(other.to_string())),
            None => Err(invalid("<missing>".to_string())),
        }
    }

    /// 成交量（普通序列为 "5. volume"，复权序列为 "6. volume"）
    pub fn volume(&self) -> Option<u64> {
        self.fields
            .iter()
            .find(|(key, _)| key.ends_with(". volume"))
            .and_then(|(_, value)| match value {
                Value::String(s) => s.trim().parse().ok(),
                Value::Number(n) => n.as_u64(),
                _ => None,
            })
    }
}

/// 按接口返回顺序排列的时间序列，不做重新排序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    /// 从接口返回的 JSON 对象构造，非对象的条目视为无字段
    pub fn from_json(map: &Map<String, Value>) -> Self {
        let points = map
            .iter()
            .map(|(date, value)| {
                let fields = value.as_object().cloned().unwrap_or_default();
                TimeSeriesPoint::new(date.clone(), fields)
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.date.as_str())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 按字典序最早的日期
    pub fn earliest_date(&self) -> Option<&str> {
        self.dates().min()
    }

    /// 按字典序最近的日期
    pub fn latest_date(&self) -> Option<&str> {
        self.dates().max()
    }
}

/// 股票历史K线数据（JSON 接口输出）
///
/// 包含单个周期的 OHLCV 数据
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StockHistoryData {
    /// 日期
    pub date: String,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量
    pub volume: Option<u64>,
}

impl TryFrom<&TimeSeriesPoint> for StockHistoryData {
    type Error = StockError;

    fn try_from(point: &TimeSeriesPoint) -> StockResult<Self> {
        Ok(Self {
            date: point.date.clone(),
            open: point.price(PriceField::Open)?,
            high: point.price(PriceField::High)?,
            low: point.price(PriceField::Low)?,
            close: point.price(PriceField::Close)?,
            volume: point.volume(),
        })
    }
}

/// 历史数据查询参数
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Alpha Vantage function，默认日线
    #[serde(default = "default_function")]
    pub function: String,
    /// 开始日期（YYYY-MM-DD）
    pub start_date: String,
    /// 结束日期（YYYY-MM-DD）
    pub end_date: String,
}

fn default_function() -> String {
    "TIME_SERIES_DAILY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(date: &str, value: Value) -> TimeSeriesPoint {
        TimeSeriesPoint::new(date, value.as_object().cloned().unwrap())
    }

    #[test]
    fn test_price_parses_string_numbers() {
        let p = point("2024-01-02", json!({"1. open": "187.1500", "4. close": 185.64}));
        assert_eq!(p.price(PriceField::Open).unwrap(), 187.15);
        assert_eq!(p.price(PriceField::Close).unwrap(), 185.64);
    }

    #[test]
    fn test_price_rejects_missing_and_garbage() {
        let p = point("2024-01-02", json!({"1. open": "n/a"}));
        match p.price(PriceField::Open) {
            Err(StockError::InvalidFieldValue { field, value, .. }) => {
                assert_eq!(field, "1. open");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            p.price(PriceField::High),
            Err(StockError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_price_rejects_non_finite_values() {
        for raw in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let p = point("2024-01-02", json!({"1. open": raw}));
            match p.price(PriceField::Open) {
                Err(StockError::InvalidFieldValue { value, .. }) => assert_eq!(value, raw),
                other => panic!("{} 应被拒绝: {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_volume_for_plain_and_adjusted() {
        let plain = point("2024-01-02", json!({"5. volume": "4437900"}));
        let adjusted = point("2024-01-02", json!({"5. adjusted close": "180.1", "6. volume": "12"}));
        assert_eq!(plain.volume(), Some(4_437_900));
        assert_eq!(adjusted.volume(), Some(12));
    }

    #[test]
    fn test_from_json_keeps_order_and_bounds() {
        let raw = json!({
            "2024-01-05": {"1. open": "1"},
            "2024-01-03": {"1. open": "2"},
            "2024-01-04": {"1. open": "3"}
        });
        let series = TimeSeries::from_json(raw.as_object().unwrap());
        let dates: Vec<&str> = series.dates().collect();
        assert_eq!(dates, vec!["2024-01-05", "2024-01-03", "2024-01-04"]);
        assert_eq!(series.earliest_date(), Some("2024-01-03"));
        assert_eq!(series.latest_date(), Some("2024-01-05"));
    }

    #[test]
    fn test_history_data_from_point() {
        let p = point(
            "2024-01-02",
            json!({"1. open": "100", "2. high": "105", "3. low": "99", "4. close": "102", "5. volume": "10"}),
        );
        let data = StockHistoryData::try_from(&p).unwrap();
        assert_eq!(data.high, 105.0);
        assert_eq!(data.volume, Some(10));
    }
}
