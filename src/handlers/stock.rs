//! 行情数据 JSON 接口
//!
//! - GET /api/v1/symbols - 股票代码列表
//! - GET /api/v1/stocks/{symbol}/history - 指定区间的 OHLCV 数据

use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::error::StockResult;
use crate::handlers::{query_config, AppState};
use crate::models::{ApiResponse, HistoryQuery, StockHistoryData};
use crate::services::{dates, symbols};

pub async fn list_symbols(state: web::Data<AppState>) -> Result<HttpResponse> {
    match symbols::load_symbols(&state.config.data.symbols_file) {
        Ok(symbols) => Ok(HttpResponse::Ok().json(ApiResponse::success(symbols))),
        Err(e) => {
            log::error!("读取股票代码列表失败: {}", e);
            Ok(e.error_response())
        }
    }
}

pub async fn get_stock_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();

    match fetch_history(&state, &symbol, &query).await {
        Ok(history) => Ok(HttpResponse::Ok().json(ApiResponse::success(history))),
        Err(e) => {
            log::warn!("{} 历史数据获取失败: {}", symbol, e);
            Ok(e.error_response())
        }
    }
}

async fn fetch_history(
    state: &AppState,
    symbol: &str,
    query: &HistoryQuery,
) -> StockResult<Vec<StockHistoryData>> {
    dates::parse_range(&query.start_date, &query.end_date)?;

    let series = state
        .client
        .fetch(symbol, &query.function, &query.start_date, &query.end_date)
        .await?;

    series.points().iter().map(StockHistoryData::try_from).collect()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/symbols", web::get().to(list_symbols)).service(
        web::scope("/stocks")
            .app_data(query_config())
            .route("/{symbol}/history", web::get().to(get_stock_history)),
    );
}
