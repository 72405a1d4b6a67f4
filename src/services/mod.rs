//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod alphavantage; // Alpha Vantage 行情接口
pub mod chart;        // 图表生成
pub mod dates;        // 日期校验
pub mod symbols;      // 股票代码列表
