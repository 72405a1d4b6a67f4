//! 错误类型
//!
//! 所有请求级错误都只影响当前请求，唯一的致命错误是启动时无法读取股票代码文件

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::ApiResponse;

pub type StockResult<T> = Result<T, StockError>;

#[derive(Debug, Error)]
pub enum StockError {
    /// 网络层失败（连接、超时、读取响应体），不含请求地址
    #[error("请求行情接口失败: {0}")]
    Transport(reqwest::Error),
    #[error("行情接口返回异常状态码: {0}")]
    HttpStatus(u16),
    /// 接口返回了错误信息、空响应或无法识别的数据
    #[error("行情接口错误: {0}")]
    Upstream(String),
    #[error("{symbol} 在 {start} 至 {end} 之间没有数据{}", hint(.earliest, .latest))]
    EmptyRange {
        symbol: String,
        start: String,
        end: String,
        earliest: Option<String>,
        latest: Option<String>,
    },
    #[error("无效的图表类型: {0}（可选 Line 或 Bar）")]
    InvalidChartKind(String),
    #[error("{date} 的字段 {field} 不是有效数值: {value}")]
    InvalidFieldValue {
        date: String,
        field: String,
        value: String,
    },
    #[error("日期格式错误: {0}，请使用 YYYY-MM-DD")]
    InvalidDate(String),
    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("解析 CSV 失败: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0} 缺少 Symbol 列")]
    MissingSymbolColumn(String),
    #[error("图表渲染失败: {0}")]
    Render(String),
    #[error("无效的接口地址: {0}")]
    Url(#[from] url::ParseError),
}

fn hint(earliest: &Option<String>, latest: &Option<String>) -> String {
    match (earliest, latest) {
        (Some(earliest), Some(latest)) => {
            format!("，可用数据范围为 {} 至 {}，请调整日期区间", earliest, latest)
        }
        _ => String::new(),
    }
}

/// 请求地址带有 apikey，转换时去掉，避免写入日志或页面
impl From<reqwest::Error> for StockError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

impl ResponseError for StockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidChartKind(_) | Self::InvalidDate(_) => StatusCode::BAD_REQUEST,
            Self::EmptyRange { .. } => StatusCode::NOT_FOUND,
            Self::Transport(_) | Self::HttpStatus(_) | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}
