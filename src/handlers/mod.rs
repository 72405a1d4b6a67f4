pub mod health;
pub mod index;
pub mod stock;

use actix_web::{error, web, HttpResponse};

use crate::config::AppConfig;
use crate::error::StockResult;
use crate::models::ApiResponse;
use crate::services::alphavantage::AlphaVantageClient;

/// 请求间共享的只读状态
pub struct AppState {
    pub config: AppConfig,
    pub client: AlphaVantageClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> StockResult<Self> {
        let client = AlphaVantageClient::new(&config.api)?;
        Ok(Self { config, client })
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(form_config())
        .configure(index::config)
        .service(
            web::scope("/api/v1")
                .configure(health::config)
                .configure(stock::config),
        );
}

/// 表单缺少字段时返回 400，并记录原因
fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, req| {
        log::warn!("{} {} 表单无效: {}", req.method(), req.path(), err);
        let response = HttpResponse::BadRequest()
            .content_type("text/plain; charset=utf-8")
            .body(format!("表单无效: {}", err));
        error::InternalError::from_response(err, response).into()
    })
}

/// 查询参数缺失时返回统一的 JSON 错误
pub(crate) fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        log::warn!("{} {} 查询参数无效: {}", req.method(), req.path(), err);
        let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}
