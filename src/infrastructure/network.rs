use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use crate::infrastructure::error::AlertError;

/// 网络客户端配置
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("haze-alert/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

impl NetworkConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        // 连接超时不应超过整体超时
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }
}

/// 网络客户端管理器
///
/// 单次请求，不做重试：定时任务下一次运行就是重试。
#[derive(Debug, Clone)]
pub struct NetworkManager {
    client: Client,
    config: NetworkConfig,
}

impl NetworkManager {
    pub fn new(config: NetworkConfig) -> Result<Self, AlertError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| AlertError::network(
                format!("Failed to create HTTP client: {}", e),
                None
            ))?;

        Ok(Self { client, config })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET 并要求 2xx 状态码
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, AlertError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AlertError::network(
                    format!("Request timed out after {}s", self.config.timeout.as_secs()),
                    Some(url.to_string()),
                )
            } else {
                AlertError::network(format!("Request failed: {}", e), Some(url.to_string()))
            }
        })?;

        if !response.status().is_success() {
            return Err(AlertError::network(
                format!("HTTP error: {}", response.status()),
                Some(url.to_string()),
            ));
        }

        Ok(response)
    }

    /// GET 并把响应体解析为 JSON
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, AlertError> {
        let response = self.get(url).await?;
        let body = response.text().await.map_err(|e| {
            AlertError::network(format!("Failed to read response body: {}", e), Some(url.to_string()))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            AlertError::network(format!("Response is not valid JSON: {}", e), Some(url.to_string()))
        })
    }
}
