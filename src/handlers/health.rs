//! 健康检查
//!
//! 除服务本身外，还检查股票代码文件是否可读（首页依赖该文件）

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;
use crate::models::ApiResponse;
use crate::services::symbols;

/// 健康状态
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub service: String,
    pub version: String,
    /// 股票代码数量，文件不可读时为 None
    pub symbols: Option<usize>,
}

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = HealthStatus {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        symbols: symbols::load_symbols(&state.config.data.symbols_file)
            .map(|list| list.len())
            .ok(),
    };

    match status.symbols {
        Some(_) => HttpResponse::Ok().json(ApiResponse::success(status)),
        None => {
            log::warn!("健康检查: 股票代码文件 {} 不可读", state.config.data.symbols_file.display());
            let response = ApiResponse {
                success: false,
                data: Some(status),
                message: "股票代码文件不可读".to_string(),
                ..ApiResponse::error(String::new())
            };
            HttpResponse::ServiceUnavailable().json(response)
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
