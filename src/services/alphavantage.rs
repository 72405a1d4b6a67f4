//! Alpha Vantage 行情接口
//!
//! 对接 https://www.alphavantage.co/query ，获取日/周/月 K 线并按日期区间过滤
//!
//! 接口返回的 JSON 对象中元数据（"Meta Data"）在前、时间序列在后，
//! 时间序列的键名随 function 变化（"Time Series (Daily)"、"Weekly Time Series" 等），
//! 因此按最后一个顶层键取数据，依赖 serde_json 的 preserve_order

use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{StockError, StockResult};
use crate::models::{TimeSeries, TimeSeriesPoint};

/// 接口在参数错误时返回的字段
const ERROR_MESSAGE_KEY: &str = "Error Message";

/// Alpha Vantage 客户端
///
/// 内部的 reqwest::Client 可在请求间共享
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    /// 按配置创建客户端，超时时间显式设置
    pub fn new(config: &ApiConfig) -> StockResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        // 提前校验地址，避免每次请求才发现配置错误
        Url::parse(&config.base_url)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// 构造查询地址
    pub fn query_url(&self, symbol: &str, function: &str) -> StockResult<Url> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("function", function),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
                ("datatype", "json"),
            ],
        )?;
        Ok(url)
    }

    /// 获取时间序列并过滤到 [start_date, end_date]
    ///
    /// 只请求一次，失败不重试；过滤结果为空时返回 EmptyRange，附带可用的日期范围
    pub async fn fetch(
        &self,
        symbol: &str,
        function: &str,
        start_date: &str,
        end_date: &str,
    ) -> StockResult<TimeSeries> {
        let url = self.query_url(symbol, function)?;
        log::info!("请求行情数据 URL: {}", redact_api_key(&url));

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(StockError::HttpStatus(response.status().as_u16()));
        }

        let text = response.text().await?;
        let preview: String = text.chars().take(200).collect();
        log::debug!("原始响应数据: {}", preview);

        let payload = parse_payload(&text)?;
        let raw_series = extract_time_series(&payload)?;
        let series = TimeSeries::from_json(raw_series);
        log::info!("{} {} 共 {} 条数据", symbol, function, series.len());

        let filtered = filter_by_date_range(&series, start_date, end_date);
        if filtered.is_empty() {
            return Err(StockError::EmptyRange {
                symbol: symbol.to_string(),
                start: start_date.to_string(),
                end: end_date.to_string(),
                earliest: series.earliest_date().map(str::to_string),
                latest: series.latest_date().map(str::to_string),
            });
        }

        log::info!(
            "{} 在 {} 至 {} 之间有 {} 条数据",
            symbol,
            start_date,
            end_date,
            filtered.len()
        );
        Ok(filtered)
    }
}

/// 解析响应体，拒绝空响应、非对象和接口错误
pub fn parse_payload(body: &str) -> StockResult<Map<String, Value>> {
    if body.trim().is_empty() {
        return Err(StockError::Upstream("接口返回空响应".to_string()));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| StockError::Upstream(format!("解析JSON失败: {}", e)))?;

    let Value::Object(map) = value else {
        return Err(StockError::Upstream("响应不是 JSON 对象".to_string()));
    };

    if let Some(message) = map.get(ERROR_MESSAGE_KEY) {
        let message = message.as_str().map(str::to_string).unwrap_or_else(|| message.to_string());
        return Err(StockError::Upstream(message));
    }

    if map.is_empty() {
        return Err(StockError::Upstream("接口未返回数据".to_string()));
    }

    Ok(map)
}

/// 取最后一个顶层键对应的时间序列
///
/// 限流时接口只返回 {"Note": "..."} 或 {"Information": "..."}，
/// 最后一个键的值不是对象，按接口错误处理
pub fn extract_time_series(payload: &Map<String, Value>) -> StockResult<&Map<String, Value>> {
    let (key, value) = payload
        .iter()
        .last()
        .ok_or_else(|| StockError::Upstream("接口未返回数据".to_string()))?;

    match value {
        Value::Object(series) if series.is_empty() => {
            Err(StockError::Upstream(format!("时间序列 \"{}\" 为空", key)))
        }
        Value::Object(series) => Ok(series),
        other => {
            let detail = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
            Err(StockError::Upstream(format!("{}: {}", key, detail)))
        }
    }
}

/// 按日期字符串的字典序过滤，保留 start <= date <= end 的数据点，顺序不变
///
/// YYYY-MM-DD 的字典序与时间顺序一致
pub fn filter_by_date_range(series: &TimeSeries, start_date: &str, end_date: &str) -> TimeSeries {
    let points: Vec<TimeSeriesPoint> = series
        .points()
        .iter()
        .filter(|p| start_date <= p.date.as_str() && p.date.as_str() <= end_date)
        .cloned()
        .collect();
    TimeSeries::new(points)
}

/// 日志里隐藏 apikey 参数
fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
