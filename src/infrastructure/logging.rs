use std::io;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// 日志配置
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    pub include_file_location: bool,
    /// EnvFilter 指令，设置后取代 `level`
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            include_file_location: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// 根据 --verbose 生成单次运行的日志配置
    pub fn for_run(verbose: bool) -> Self {
        Self {
            level: if verbose { Level::DEBUG } else { Level::WARN },
            ..Default::default()
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unknown log format: {}", other),
        }
    }
}

/// 日志输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// 追加写入文件
    File(String),
}

impl LogOutput {
    /// `stdout`、`stderr`，其余值视为文件路径
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "stdout" => LogOutput::Stdout,
            "" | "stderr" => LogOutput::Stderr,
            path => LogOutput::File(path.to_string()),
        }
    }
}

/// 设置日志系统
///
/// 重复初始化（例如测试中）会返回错误而不是 panic。
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = &config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::from_default_env()
            .add_directive(format!("haze_alert={}", config.level).parse()?)
    };

    let fmt_layer = match &config.output {
        LogOutput::Stdout => create_fmt_layer(&config, io::stdout),
        LogOutput::Stderr => create_fmt_layer(&config, io::stderr),
        LogOutput::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            create_fmt_layer(&config, Mutex::new(file))
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

fn create_fmt_layer<W>(config: &LoggingConfig, make_writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_level(true)
        .with_file(config.include_file_location)
        .with_line_number(config.include_file_location);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// 单次运行的日志记录器
///
/// 显式传给每个需要输出诊断信息的组件。普通日志只在 verbose 时输出，
/// `always` 用于测试模式，无论 verbose 与否都会打印。
#[derive(Debug, Clone)]
pub struct RunLogger {
    component: String,
    verbose: bool,
}

impl RunLogger {
    pub fn new(verbose: bool) -> Self {
        Self {
            component: "haze_alert".to_string(),
            verbose,
        }
    }

    /// 同一 verbose 设置下的子组件记录器
    pub fn for_component(&self, component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            verbose: self.verbose,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn info(&self, message: &str, fields: Option<&[(&str, &str)]>) {
        if !self.verbose {
            return;
        }
        tracing::info!(
            component = %self.component,
            fields = %render_fields(fields),
            "{}",
            message
        );
    }

    pub fn warn(&self, message: &str, fields: Option<&[(&str, &str)]>) {
        if !self.verbose {
            return;
        }
        tracing::warn!(
            component = %self.component,
            fields = %render_fields(fields),
            "{}",
            message
        );
    }

    pub fn error(&self, message: &str, error: Option<&dyn std::error::Error>, fields: Option<&[(&str, &str)]>) {
        if !self.verbose {
            return;
        }
        match error {
            Some(err) => tracing::error!(
                component = %self.component,
                error = %err,
                fields = %render_fields(fields),
                "{}",
                message
            ),
            None => tracing::error!(
                component = %self.component,
                fields = %render_fields(fields),
                "{}",
                message
            ),
        }
    }

    pub fn debug(&self, message: &str, fields: Option<&[(&str, &str)]>) {
        if !self.verbose {
            return;
        }
        tracing::debug!(
            component = %self.component,
            fields = %render_fields(fields),
            "{}",
            message
        );
    }

    /// 不受 verbose 控制的输出
    pub fn always(&self, message: &str) {
        println!("{}", message);
        tracing::debug!(component = %self.component, "{}", message);
    }
}

fn render_fields(fields: Option<&[(&str, &str)]>) -> String {
    fields
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
