//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// API Key 环境变量，优先于配置文件
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 行情接口配置
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Alpha Vantage 查询地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Alpha Vantage API Key
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

// API Key 不出现在日志里
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// 数据文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// 股票代码 CSV 文件（需包含 Symbol 列）
    #[serde(default = "default_symbols_file")]
    pub symbols_file: PathBuf,
}

/// 图表配置
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

/// 表单配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// 日期格式错误时直接拒绝，不请求接口；关闭后仅记录警告
    #[serde(default = "default_strict_dates")]
    pub strict_dates: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 配置来源文件，使用默认值时为空
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_base_url() -> String { "https://www.alphavantage.co/query".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_symbols_file() -> PathBuf { PathBuf::from("stocks.csv") }
fn default_chart_width() -> u32 { 960 }
fn default_chart_height() -> u32 { 540 }
fn default_strict_dates() -> bool { true }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symbols_file: default_symbols_file(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            strict_dates: default_strict_dates(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.source = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// 加载配置：依次查找 config.json、config/config.json，都不存在则使用默认值
    ///
    /// 此时日志系统尚未初始化，文件存在但解析失败直接返回错误
    pub fn load() -> anyhow::Result<Self> {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = match config_paths.iter().find(|p| Path::new(p).exists()) {
            Some(path) => Self::from_file(path)
                .map_err(|e| anyhow::anyhow!("加载配置文件 {} 失败: {}", path, e))?,
            None => Self::default(),
        };
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// 用环境变量覆盖 API Key
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = key.trim().to_string();
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
