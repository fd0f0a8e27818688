use clap::Parser;
use haze_alert::cli::args::Args;
use haze_alert::config::Config;
use haze_alert::infrastructure::{setup_logging, AlertError, RunLogger};
use haze_alert::{App, RunOptions, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::new();
    config.update_from_args(&args);

    setup_logging(config.logging(args.verbose))?;
    let logger = RunLogger::new(args.verbose);

    if let Err(e) = config.validate() {
        logger.error("配置无效", Some(&AlertError::config(e.to_string())), None);
        return Ok(());
    }

    let app = App::new(config, logger.clone())?;

    match app.run(&RunOptions::from_args(&args)).await {
        Ok(RunOutcome::Unchanged) => Ok(()),
        Ok(RunOutcome::Completed { new_state, message, .. }) => {
            logger.debug(
                "运行完成",
                Some(&[
                    ("last_ts", &new_state.last_timestamp.to_string()),
                    ("last_val", &new_state.last_value.to_string()),
                    ("notified", if message.is_some() { "true" } else { "false" }),
                ]),
            );
            Ok(())
        }
        // 已在 App 内记录
        Err(e) if e.is_abort() => Ok(()),
        Err(e) => {
            logger.error("运行失败", Some(&e), None);
            Err(e.into())
        }
    }
}
