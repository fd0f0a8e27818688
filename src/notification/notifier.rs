use std::sync::Arc;

use crate::infrastructure::{AlertError, RunLogger};
use crate::models::Credentials;
use crate::notification::providers::{SmsGateway, SmsRequest};

/// 发送结果，仅用于日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub ok: bool,
    pub detail: String,
}

impl SendResult {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}

/// 短信发送
///
/// 测试模式下不访问网关，只打印完整的请求 URL 并视为成功。
/// 发送失败不会中止本次运行。
pub struct Notifier {
    gateway: Arc<dyn SmsGateway>,
    test_mode: bool,
    logger: RunLogger,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn SmsGateway>, test_mode: bool, logger: &RunLogger) -> Self {
        Self {
            gateway,
            test_mode,
            logger: logger.for_component("notifier"),
        }
    }

    pub async fn send(&self, credentials: &Credentials, message: &str) -> SendResult {
        let request = SmsRequest::new(credentials, message);

        if self.test_mode {
            return match request.to_url(self.gateway.endpoint()) {
                Ok(url) => {
                    self.logger.always(&format!("Test Mode: {}", url));
                    SendResult::success(url.to_string())
                }
                Err(e) => {
                    self.logger.error("无法构建短信请求", Some(&e), None);
                    SendResult::failure(e.to_string())
                }
            };
        }

        match self.gateway.deliver(&request).await {
            Ok(response) if response.is_success() => {
                self.logger.info(
                    "短信已发送",
                    Some(&[
                        ("gateway", self.gateway.name()),
                        ("txn_ref", response.txn_ref.as_deref().unwrap_or("")),
                    ]),
                );
                SendResult::success("短信已发送")
            }
            Ok(response) => {
                let error = AlertError::send_failure("网关拒绝了请求", response.status.clone());
                self.logger.error(
                    "短信发送失败",
                    Some(&error),
                    Some(&[("status", response.status.as_deref().unwrap_or("<missing>"))]),
                );
                SendResult::failure(format!(
                    "gateway status: {}",
                    response.status.as_deref().unwrap_or("<missing>")
                ))
            }
            Err(e) => {
                let error = AlertError::send_failure(e.to_string(), None);
                self.logger.error("短信发送失败", Some(&error), Some(&[("gateway", self.gateway.name())]));
                SendResult::failure(e.to_string())
            }
        }
    }
}
