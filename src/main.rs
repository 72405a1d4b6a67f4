//! 股票行情图表服务
//!
//! 从 Alpha Vantage 获取历史行情，按日期区间过滤后渲染为折线图或柱状图，内嵌在表单页面中

mod config;    // 配置
mod error;     // 错误类型
mod handlers;  // HTTP 请求处理器
mod models;    // 数据模型定义
mod services;  // 业务逻辑服务
mod views;     // 页面渲染

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{bail, Context};
use env_logger::Env;

use crate::config::{AppConfig, API_KEY_ENV};
use crate::handlers::AppState;

/// 应用程序入口
///
/// 读取配置和股票代码列表后启动 HTTP 服务器，默认监听 0.0.0.0:5000
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &config.source {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("使用默认配置"),
    }

    if config.api.api_key.is_empty() {
        bail!("未配置 Alpha Vantage API Key，请设置 {} 环境变量或 api.api_key", API_KEY_ENV);
    }

    // 股票代码列表不可用时表单无法使用，直接退出
    let symbols = services::symbols::load_symbols(&config.data.symbols_file).with_context(|| {
        format!("读取股票代码列表 {} 失败", config.data.symbols_file.display())
    })?;
    log::info!("加载 {} 个股票代码", symbols.len());

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    let state = web::Data::new(AppState::new(config)?);

    log::info!("启动股票图表服务，监听 {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config) // 配置路由
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
