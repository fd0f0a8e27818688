use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::infrastructure::{AlertError, NetworkManager};
use crate::models::Credentials;

/// Hoiio 短信接口
pub const HOIIO_SMS_API: &str = "https://secure.hoiio.com/open/sms/send";

/// 发送成功时响应中的 `status`
pub const SUCCESS_STATUS: &str = "success_ok";

/// 短信请求参数，以查询字符串形式发送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRequest {
    pub app_id: String,
    pub access_token: String,
    pub dest: String,
    pub msg: String,
}

impl SmsRequest {
    pub fn new(credentials: &Credentials, message: impl Into<String>) -> Self {
        Self {
            app_id: credentials.app_id.clone(),
            access_token: credentials.token.clone(),
            dest: credentials.destination.clone(),
            msg: message.into(),
        }
    }

    /// 完整的请求 URL，参数经过 URL 编码
    pub fn to_url(&self, endpoint: &str) -> Result<Url, AlertError> {
        Url::parse_with_params(
            endpoint,
            &[
                ("app_id", self.app_id.as_str()),
                ("access_token", self.access_token.as_str()),
                ("dest", self.dest.as_str()),
                ("msg", self.msg.as_str()),
            ],
        )
        .map_err(|e| AlertError::config(format!("短信接口地址无效 {}: {}", endpoint, e)))
    }
}

/// Hoiio API 响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsResponse {
    pub status: Option<String>,
    pub txn_ref: Option<String>,
}

impl SmsResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }
}

/// 短信网关 trait
#[async_trait]
pub trait SmsGateway: Send + Sync {
    fn name(&self) -> &str;
    fn endpoint(&self) -> &str;
    async fn deliver(&self, request: &SmsRequest) -> anyhow::Result<SmsResponse>;
}

/// Hoiio 短信网关
pub struct HoiioGateway {
    endpoint: String,
    network: NetworkManager,
}

impl HoiioGateway {
    pub fn new(endpoint: impl Into<String>, network: NetworkManager) -> Self {
        Self {
            endpoint: endpoint.into(),
            network,
        }
    }
}

#[async_trait]
impl SmsGateway for HoiioGateway {
    fn name(&self) -> &str {
        "hoiio"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn deliver(&self, request: &SmsRequest) -> anyhow::Result<SmsResponse> {
        let url = request.to_url(&self.endpoint)?;

        let response = self.network.client().get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // 错误时 Hoiio 同样返回带 status 的 JSON，因此不先检查 HTTP 状态码
        serde_json::from_str::<SmsResponse>(&body).map_err(|e| {
            anyhow::anyhow!("Hoiio 响应无法解析 (HTTP {}): {}", status, e)
        })
    }
}
