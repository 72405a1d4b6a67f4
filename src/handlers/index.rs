//! 首页处理器
//!
//! - GET / - 显示空表单
//! - POST / - 根据表单获取行情并生成图表

use actix_web::{web, HttpResponse};

use crate::error::StockResult;
use crate::handlers::AppState;
use crate::models::{ChartForm, RenderedChart};
use crate::services::{chart, dates, symbols};
use crate::views::{render_index, IndexPage};

pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let symbols = match symbols::load_symbols(&state.config.data.symbols_file) {
        Ok(symbols) => symbols,
        Err(e) => return symbols_unavailable(e),
    };

    html(render_index(&IndexPage {
        symbols: &symbols,
        ..Default::default()
    }))
}

pub async fn submit(state: web::Data<AppState>, form: web::Form<ChartForm>) -> HttpResponse {
    let symbols = match symbols::load_symbols(&state.config.data.symbols_file) {
        Ok(symbols) => symbols,
        Err(e) => return symbols_unavailable(e),
    };
    let form = form.into_inner();

    match generate_chart(&state, &form).await {
        Ok(chart) => html(render_index(&IndexPage {
            symbols: &symbols,
            form: Some(&form),
            chart: Some(&chart),
            message: None,
        })),
        Err(e) => {
            log::warn!("{} 图表生成失败: {}", form.symbol, e);
            html(render_index(&IndexPage {
                symbols: &symbols,
                form: Some(&form),
                chart: None,
                message: Some(e.to_string()),
            }))
        }
    }
}

/// 校验日期 -> 获取行情 -> 生成图表
async fn generate_chart(state: &AppState, form: &ChartForm) -> StockResult<RenderedChart> {
    if let Err(e) = dates::parse_range(&form.start_date, &form.end_date) {
        if state.config.form.strict_dates {
            return Err(e);
        }
        log::warn!("{}，按原始字符串继续查询", e);
    }

    let series = state
        .client
        .fetch(&form.symbol, &form.function, &form.start_date, &form.end_date)
        .await?;

    chart::build_chart(&series, &form.title(), &form.chart_type, &state.config.chart)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn symbols_unavailable(e: crate::error::StockError) -> HttpResponse {
    log::error!("读取股票代码列表失败: {}", e);
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body("股票代码列表不可用")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(index))
            .route(web::post().to(submit)),
    );
}
