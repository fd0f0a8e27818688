pub mod number;

use std::fmt;

pub use number::LooseNumber;

/// 某一时刻的 PSI 读数
///
/// `timestamp` 由数据源的基准日期加上小时偏移得出，不是本机时间。
/// `value` 为 `None` 表示该小时的读数尚未发布。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: i64,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: i64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// 上一次处理过的读数，跨运行持久化
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlertState {
    pub last_timestamp: i64,
    pub last_value: f64,
}

impl AlertState {
    pub fn new(last_timestamp: i64, last_value: f64) -> Self {
        Self {
            last_timestamp,
            last_value,
        }
    }

    /// 没有历史状态时的零值 `{0, 0.0}`
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Hoiio 短信凭据
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub token: String,
    pub destination: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, token: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            token: token.into(),
            destination: destination.into(),
        }
    }
}

// token 不进日志
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("token", &"***")
            .field("destination", &self.destination)
            .finish()
    }
}
