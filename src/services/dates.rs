//! 日期校验

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{StockError, StockResult};

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

/// 按严格的 YYYY-MM-DD 格式解析日期
///
/// chrono 的 `%m`/`%d` 接受不补零的写法，这里先用正则限定位数，
/// 保证通过校验的日期字符串按字典序比较等同于按时间比较
pub fn parse_date(input: &str) -> StockResult<NaiveDate> {
    if !date_pattern().is_match(input) {
        return Err(StockError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| StockError::InvalidDate(input.to_string()))
}

/// 校验起止日期，两者都合法时返回解析结果
pub fn parse_range(start: &str, end: &str) -> StockResult<(NaiveDate, NaiveDate)> {
    Ok((parse_date(start)?, parse_date(end)?))
}
