//! 图表数据模型

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{StockError, StockResult};
use crate::models::{PriceField, TimeSeries};

/// 图表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [Self::Line, Self::Bar];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Bar => "Bar",
        }
    }
}

impl FromStr for ChartKind {
    type Err = StockError;

    fn from_str(s: &str) -> StockResult<Self> {
        match s {
            "Line" => Ok(Self::Line),
            "Bar" => Ok(Self::Bar),
            other => Err(StockError::InvalidChartKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 待渲染的图表描述
///
/// labels 与四组价格按位置一一对应
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub kind: ChartKind,
}

impl ChartSpec {
    /// 从时间序列提取 OHLC 四组数据，任一字段非数值即失败
    pub fn from_series(series: &TimeSeries, title: &str, kind: ChartKind) -> StockResult<Self> {
        let mut spec = Self {
            title: title.to_string(),
            labels: Vec::with_capacity(series.len()),
            open: Vec::with_capacity(series.len()),
            high: Vec::with_capacity(series.len()),
            low: Vec::with_capacity(series.len()),
            close: Vec::with_capacity(series.len()),
            kind,
        };

        for point in series.points() {
            spec.labels.push(point.date.clone());
            spec.open.push(point.price(PriceField::Open)?);
            spec.high.push(point.price(PriceField::High)?);
            spec.low.push(point.price(PriceField::Low)?);
            spec.close.push(point.price(PriceField::Close)?);
        }

        Ok(spec)
    }

    /// 按 Open、High、Low、Close 顺序返回 (名称, 数据)
    pub fn series(&self) -> [(&'static str, &[f64]); 4] {
        [
            (PriceField::Open.label(), self.open.as_slice()),
            (PriceField::High.label(), self.high.as_slice()),
            (PriceField::Low.label(), self.low.as_slice()),
            (PriceField::Close.label(), self.close.as_slice()),
        ]
    }

    /// 全部价格的最小值和最大值
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series()
            .into_iter()
            .flat_map(|(_, values)| values.iter().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// 渲染完成的图表（内嵌 SVG）
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart(pub String);

impl RenderedChart {
    pub fn svg(&self) -> &str {
        &self.0
    }
}

/// 页面表单提交内容，所有字段必填
#[derive(Debug, Clone, Deserialize)]
pub struct ChartForm {
    pub symbol: String,
    pub chart_type: String,
    pub function: String,
    pub start_date: String,
    pub end_date: String,
}

impl ChartForm {
    /// 图表标题
    pub fn title(&self) -> String {
        format!(
            "{} Stock Prices ({} to {})",
            self.symbol, self.start_date, self.end_date
        )
    }
}
