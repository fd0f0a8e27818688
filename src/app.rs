use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::args::Args;
use crate::config::{expand_home, load_credentials, Config};
use crate::infrastructure::{AlertError, NetworkManager, RunLogger};
use crate::models::AlertState;
use crate::notification::{
    Decision, HoiioGateway, MessageTemplates, NotificationEngine, Notifier, SendResult, SmsGateway,
};
use crate::reading::{self, DataSource, ReadingProvider};
use crate::state::StateStore;

/// 单次运行的输入
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scratch: PathBuf,
    pub source: DataSource,
    pub identity: PathBuf,
    pub threshold: f64,
    pub test_mode: bool,
}

impl RunOptions {
    pub fn from_args(args: &Args) -> Self {
        Self {
            scratch: PathBuf::from(&args.scratch),
            source: DataSource::new(args.datasource.clone(), args.url),
            identity: expand_home(&args.identity),
            threshold: args.threshold,
            test_mode: args.test,
        }
    }
}

/// 单次运行的结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 与上次是同一份数据，什么都没做
    Unchanged,
    Completed {
        new_state: AlertState,
        message: Option<String>,
        send: Option<SendResult>,
        using_last: bool,
    },
}

impl RunOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            RunOutcome::Unchanged => None,
            RunOutcome::Completed { message, .. } => message.as_deref(),
        }
    }
}

/// 把各组件按顺序串起来：凭据、读数、状态、判定、发送、写状态
///
/// 唯一的写操作在最后；任何中止路径都不会改动草稿文件。
pub struct App {
    config: Config,
    logger: RunLogger,
    provider: ReadingProvider,
    gateway: Arc<dyn SmsGateway>,
}

impl App {
    pub fn new(config: Config, logger: RunLogger) -> Result<Self, AlertError> {
        let send_network = NetworkManager::new(config.send_network())?;
        let gateway = Arc::new(HoiioGateway::new(config.sms_url.clone(), send_network));
        Self::with_gateway(config, logger, gateway)
    }

    pub fn with_gateway(config: Config, logger: RunLogger, gateway: Arc<dyn SmsGateway>) -> Result<Self, AlertError> {
        let fetch_network = NetworkManager::new(config.fetch_network())?;
        let provider = ReadingProvider::new(fetch_network, &logger);

        Ok(Self {
            config,
            logger,
            provider,
            gateway,
        })
    }

    pub async fn run(&self, options: &RunOptions) -> Result<RunOutcome, AlertError> {
        Config::validate_threshold(options.threshold)
            .map_err(|e| self.abort("阈值无效", AlertError::config(e.to_string())))?;

        let time_display = self
            .config
            .time_display()
            .ok_or_else(|| self.abort("UTC 偏移无效", AlertError::config("UTC offset out of range")))?;

        let credentials = load_credentials(&options.identity, &self.config.app_name)
            .map_err(|e| self.abort("无法加载 Hoiio 凭据", e))?;
        self.logger.info(
            "已加载 Hoiio 凭据",
            Some(&[("app_id", &credentials.app_id), ("dest", &credentials.destination)]),
        );

        let document = self
            .provider
            .fetch(&options.source)
            .await
            .map_err(|e| self.abort("无法加载 PSI 数据", e))?;

        let current = reading::parse(&document).map_err(|e| self.abort("PSI 数据格式错误", e))?;
        let store = StateStore::new(&options.scratch, &self.logger);
        let previous = store.load();

        let engine = NotificationEngine::new(options.threshold);
        let (notification, new_state, using_last) = match engine.decide(&previous, &current) {
            Decision::Unchanged => {
                self.logger.info(
                    "数据未更新，无需处理",
                    Some(&[("timestamp", &current.timestamp.to_string())]),
                );
                return Ok(RunOutcome::Unchanged);
            }
            Decision::Proceed {
                notification,
                new_state,
                using_last,
            } => (notification, new_state, using_last),
        };

        if using_last {
            self.logger.info(
                "最新小时尚无 PSI 读数，沿用上一次的值",
                Some(&[("last_val", &previous.last_value.to_string())]),
            );
        }

        let mut message = None;
        let mut send = None;
        if let Some(notification) = notification {
            let text = MessageTemplates::new(time_display)?.render(&notification)?;
            let notifier = Notifier::new(self.gateway.clone(), options.test_mode, &self.logger);
            // 发送失败也照常写状态
            send = Some(notifier.send(&credentials, &text).await);
            message = Some(text);
        }

        store.save(&new_state)?;

        Ok(RunOutcome::Completed {
            new_state,
            message,
            send,
            using_last,
        })
    }

    fn abort(&self, message: &str, error: AlertError) -> AlertError {
        let category = error.category().to_string();
        self.logger.error(message, Some(&error), Some(&[("category", &category)]));
        error
    }
}
