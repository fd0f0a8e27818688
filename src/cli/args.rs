use clap::Parser;

use crate::config::DEFAULT_IDENTITY;

#[derive(Parser, Debug)]
#[command(
    name = "haze-alert",
    version,
    about = "PSI 超过阈值时发送短信提醒",
    long_about = "haze-alert 读取最新的 3 小时 PSI 数据，与阈值比较，在 PSI 首次达到阈值、持续高于阈值以及回落到阈值以下时通过 Hoiio 发送短信。上一次的读数保存在草稿文件中，重复运行不会重复提醒。适合由 cron 定时调用。",
    allow_negative_numbers = true
)]
pub struct Args {
    /// 输出控制台日志
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// 测试模式：打印 API 请求但不发送短信，无论是否 --verbose 都会打印
    #[arg(short, long, default_value_t = false)]
    pub test: bool,

    /// 把 DATASOURCE 当作 URL
    #[arg(short, long, default_value_t = false)]
    pub url: bool,

    /// Hoiio API 凭据文件
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_IDENTITY)]
    pub identity: String,

    /// 凭据文件中的应用名（默认 hazealert）
    #[arg(long = "app-name", value_name = "NAME")]
    pub app_name: Option<String>,

    /// 拉取数据和发送短信的超时时间（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 消息时间使用的固定 UTC 偏移（小时），默认本地时区
    #[arg(long = "utc-offset", value_name = "HOURS")]
    pub utc_offset: Option<i32>,

    /// haze-alert 草稿文件
    #[arg(value_name = "SCRATCH")]
    pub scratch: String,

    /// PSI 数据文件；配合 --url 时为 URL
    #[arg(value_name = "DATASOURCE")]
    pub datasource: String,

    /// 发送提醒的 PSI 阈值
    #[arg(value_name = "THRESHOLD")]
    pub threshold: f64,
}
