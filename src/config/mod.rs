pub mod credentials;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::{LogFormat, LogOutput, LoggingConfig, NetworkConfig};
use crate::notification::providers::HOIIO_SMS_API;
use crate::notification::TimeDisplay;

pub use credentials::{expand_home, load_credentials};

/// 凭据文件中的应用名
pub const DEFAULT_APP_NAME: &str = "hazealert";

/// 默认凭据文件
pub const DEFAULT_IDENTITY: &str = "~/.hoiioapi";

#[derive(Debug, Clone)]
pub struct Config {
    pub sms_url: String,
    pub app_name: String,
    pub fetch_timeout: Duration,
    pub send_timeout: Duration,
    /// 消息时间的固定 UTC 偏移（小时）；`None` 使用本地时区
    pub utc_offset_hours: Option<i32>,
    pub log_format: LogFormat,
    pub log_output: LogOutput,
    pub log_file_location: bool,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        // 默认配置
        let mut config = Self::defaults();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn defaults() -> Self {
        Config {
            sms_url: HOIIO_SMS_API.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            fetch_timeout: Duration::from_secs(30),
            send_timeout: Duration::from_secs(30),
            utc_offset_hours: None,
            log_format: LogFormat::Compact,
            log_output: LogOutput::Stderr,
            log_file_location: false,
            log_filter: None,
        }
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(format!("{}/.haze-alert/.env", home));
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(url) = env::var("HAZE_ALERT_SMS_URL") {
            self.sms_url = url;
        }
        if let Ok(name) = env::var("HAZE_ALERT_APP_NAME") {
            self.app_name = name;
        }
        // 无法解析的数值保持原值
        if let Some(secs) = env_secs("HAZE_ALERT_FETCH_TIMEOUT") {
            self.fetch_timeout = secs;
        }
        if let Some(secs) = env_secs("HAZE_ALERT_SEND_TIMEOUT") {
            self.send_timeout = secs;
        }
        if let Ok(offset) = env::var("HAZE_ALERT_UTC_OFFSET") {
            if let Ok(hours) = offset.trim().parse::<i32>() {
                self.utc_offset_hours = Some(hours);
            }
        }

        // 日志设置
        if let Ok(format) = env::var("HAZE_ALERT_LOG_FORMAT") {
            if let Ok(format) = format.parse::<LogFormat>() {
                self.log_format = format;
            }
        }
        if let Ok(output) = env::var("HAZE_ALERT_LOG_OUTPUT") {
            self.log_output = LogOutput::from_setting(&output);
        }
        if let Ok(location) = env::var("HAZE_ALERT_LOG_LOCATION") {
            self.log_file_location = matches!(location.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(filter) = env::var("HAZE_ALERT_LOG_FILTER") {
            if !filter.trim().is_empty() {
                self.log_filter = Some(filter);
            }
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if let Some(name) = &args.app_name {
            self.app_name = name.clone();
        }
        if let Some(secs) = args.timeout {
            self.fetch_timeout = Duration::from_secs(secs);
            self.send_timeout = Duration::from_secs(secs);
        }
        if let Some(hours) = args.utc_offset {
            self.utc_offset_hours = Some(hours);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if url::Url::parse(&self.sms_url).is_err() {
            anyhow::bail!("Invalid SMS API URL: {}", self.sms_url);
        }
        if self.app_name.trim().is_empty() {
            anyhow::bail!("App name must not be empty");
        }
        if self.fetch_timeout.is_zero() || self.send_timeout.is_zero() {
            anyhow::bail!("Timeouts must be at least one second");
        }
        if self.utc_offset_hours.is_some() && self.time_display().is_none() {
            anyhow::bail!("UTC offset out of range: {:?}", self.utc_offset_hours);
        }
        Ok(())
    }

    /// 校验阈值，阈值每次运行由命令行给出
    pub fn validate_threshold(threshold: f64) -> anyhow::Result<()> {
        if !threshold.is_finite() {
            anyhow::bail!("Threshold must be a finite number, got {}", threshold);
        }
        Ok(())
    }

    pub fn time_display(&self) -> Option<TimeDisplay> {
        match self.utc_offset_hours {
            Some(hours) => TimeDisplay::from_utc_offset_hours(hours),
            None => Some(TimeDisplay::Local),
        }
    }

    /// 本次运行的日志配置，`verbose` 决定默认级别
    pub fn logging(&self, verbose: bool) -> LoggingConfig {
        LoggingConfig {
            format: self.log_format,
            output: self.log_output.clone(),
            include_file_location: self.log_file_location,
            filter: self.log_filter.clone(),
            ..LoggingConfig::for_run(verbose)
        }
    }

    pub fn fetch_network(&self) -> NetworkConfig {
        NetworkConfig::default().with_timeout(self.fetch_timeout)
    }

    pub fn send_network(&self) -> NetworkConfig {
        NetworkConfig::default().with_timeout(self.send_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
