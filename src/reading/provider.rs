use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use crate::infrastructure::{AlertError, NetworkManager, RunLogger};

/// PSI 数据来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `is_url` 对应命令行的 `--url`
    pub fn new(location: impl Into<String>, is_url: bool) -> Self {
        let location = location.into();
        if is_url {
            DataSource::Url(location)
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// 拉取原始 JSON 文档
///
/// 任何 I/O、HTTP、JSON 错误或“假值”文档都返回 `UnavailableReading`，
/// 由调用方跳过本次运行。
pub struct ReadingProvider {
    network: NetworkManager,
    logger: RunLogger,
}

impl ReadingProvider {
    pub fn new(network: NetworkManager, logger: &RunLogger) -> Self {
        Self {
            network,
            logger: logger.for_component("reading_provider"),
        }
    }

    pub async fn fetch(&self, source: &DataSource) -> Result<Value, AlertError> {
        let origin = Some(source.to_string());

        let document = match source {
            DataSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AlertError::unavailable_reading(format!("无法读取文件: {}", e), origin.clone())
                })?;
                serde_json::from_str::<Value>(&content).map_err(|e| {
                    AlertError::unavailable_reading(format!("JSON 解析失败: {}", e), origin.clone())
                })?
            }
            DataSource::Url(url) => self
                .network
                .get_json(url)
                .await
                .map_err(|e| AlertError::unavailable_reading(e.to_string(), origin.clone()))?,
        };

        if is_falsy(&document) {
            return Err(AlertError::unavailable_reading("数据源返回空文档", origin));
        }

        self.logger.debug("已加载 PSI 数据", Some(&[("source", &source.to_string())]));
        Ok(document)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
