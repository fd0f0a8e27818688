use thiserror::Error;

/// 运行错误类型
#[derive(Error, Debug, Clone)]
pub enum AlertError {
    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("无法加载 Hoiio 凭据: {message}")]
    MissingCredentials { message: String, path: Option<String> },

    #[error("无法加载 PSI 数据: {message}")]
    UnavailableReading { message: String, origin: Option<String> },

    #[error("PSI 数据格式错误: {message}")]
    MalformedReading { message: String, field: Option<String> },

    #[error("短信发送失败: {message}")]
    SendFailure { message: String, status: Option<String> },

    #[error("存储错误: {message}")]
    Storage { message: String, path: Option<String> },

    #[error("网络错误: {message}")]
    Network { message: String, url: Option<String> },

    #[error("模板错误: {message}")]
    Template { message: String },
}

impl AlertError {
    /// 本次运行应当安静结束（退出码 0，不写状态）
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            AlertError::MissingCredentials { .. }
                | AlertError::UnavailableReading { .. }
                | AlertError::MalformedReading { .. }
                | AlertError::Configuration { .. }
        )
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            AlertError::Configuration { .. } => ErrorCategory::Configuration,
            AlertError::MissingCredentials { .. } => ErrorCategory::Configuration,
            AlertError::UnavailableReading { .. } => ErrorCategory::ExternalService,
            AlertError::MalformedReading { .. } => ErrorCategory::Data,
            AlertError::SendFailure { .. } => ErrorCategory::ExternalService,
            AlertError::Storage { .. } => ErrorCategory::IO,
            AlertError::Network { .. } => ErrorCategory::Network,
            AlertError::Template { .. } => ErrorCategory::Internal,
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        AlertError::Configuration {
            message: message.into(),
        }
    }

    pub fn missing_credentials(message: impl Into<String>, path: Option<String>) -> Self {
        AlertError::MissingCredentials {
            message: message.into(),
            path,
        }
    }

    pub fn unavailable_reading(message: impl Into<String>, origin: Option<String>) -> Self {
        AlertError::UnavailableReading {
            message: message.into(),
            origin,
        }
    }

    pub fn malformed_reading(message: impl Into<String>, field: Option<&str>) -> Self {
        AlertError::MalformedReading {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn send_failure(message: impl Into<String>, status: Option<String>) -> Self {
        AlertError::SendFailure {
            message: message.into(),
            status,
        }
    }

    /// 创建存储错误
    pub fn storage(message: impl Into<String>, path: Option<String>) -> Self {
        AlertError::Storage {
            message: message.into(),
            path,
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        AlertError::Network {
            message: message.into(),
            url,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    IO,
    Network,
    ExternalService,
    Data,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::IO => "io",
            ErrorCategory::Network => "network",
            ErrorCategory::ExternalService => "external_service",
            ErrorCategory::Data => "data",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(name)
    }
}

// 实现从常见错误类型的转换
impl From<std::io::Error> for AlertError {
    fn from(error: std::io::Error) -> Self {
        AlertError::Storage {
            message: error.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(error: serde_json::Error) -> Self {
        AlertError::MalformedReading {
            message: error.to_string(),
            field: None,
        }
    }
}

impl From<reqwest::Error> for AlertError {
    fn from(error: reqwest::Error) -> Self {
        AlertError::Network {
            message: error.to_string(),
            url: error.url().map(|u| u.to_string()),
        }
    }
}

impl From<handlebars::RenderError> for AlertError {
    fn from(error: handlebars::RenderError) -> Self {
        AlertError::Template {
            message: error.to_string(),
        }
    }
}
