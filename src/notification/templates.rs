use chrono::{DateTime, FixedOffset, Local, Utc};
use handlebars::Handlebars;
use serde_json::json;

use crate::infrastructure::AlertError;
use crate::notification::engine::{Notification, NotificationKind};

const ALERT_TEMPLATE: &str = "The official 3-hour PSI is now {{psi}} as of {{time}}. ";
const ALERT_BEGIN_TEMPLATE: &str = "These alerts will continue until PSI falls below {{threshold}}. ";
const ALERT_END_TEMPLATE: &str = "No further alerts will be sent. ";

/// 消息中时间的显示时区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDisplay {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimeDisplay {
    /// 以小时计的固定 UTC 偏移，例如新加坡为 8
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(TimeDisplay::Fixed)
    }

    /// 格式化为 `HH:MM`
    pub fn format(&self, timestamp: i64) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
            return timestamp.to_string();
        };
        match self {
            TimeDisplay::Local => utc.with_timezone(&Local).format("%H:%M").to_string(),
            TimeDisplay::Fixed(offset) => utc.with_timezone(offset).format("%H:%M").to_string(),
        }
    }
}

/// 短信文本模板
///
/// 每条短信都会去掉首尾空白以节省字数。
pub struct MessageTemplates {
    handlebars: Handlebars<'static>,
    time_display: TimeDisplay,
}

impl MessageTemplates {
    pub fn new(time_display: TimeDisplay) -> Result<Self, AlertError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        for (name, template) in [
            ("alert", ALERT_TEMPLATE),
            ("alert_begin", ALERT_BEGIN_TEMPLATE),
            ("alert_end", ALERT_END_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| AlertError::Template {
                    message: format!("模板 {} 注册失败: {}", name, e),
                })?;
        }

        Ok(Self {
            handlebars,
            time_display,
        })
    }

    pub fn render(&self, notification: &Notification) -> Result<String, AlertError> {
        let data = json!({
            "psi": format_number(notification.psi),
            "time": self.time_display.format(notification.measured_at),
            "threshold": format_number(notification.threshold),
        });

        let mut message = self.handlebars.render("alert", &data)?;
        match notification.kind {
            NotificationKind::Rising => message.push_str(&self.handlebars.render("alert_begin", &data)?),
            NotificationKind::Falling => message.push_str(&self.handlebars.render("alert_end", &data)?),
            NotificationKind::Sustained => {}
        }

        Ok(message.trim().to_string())
    }
}

/// 整数值保留一位小数（`120.0`），其余使用最短表示（`87.5`）
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singapore() -> TimeDisplay {
        TimeDisplay::from_utc_offset_hours(8).unwrap()
    }

    fn notification(kind: NotificationKind, psi: f64) -> Notification {
        Notification {
            kind,
            psi,
            // 2013-06-21 05:00:00 UTC
            measured_at: 1371790800,
            threshold: 100.0,
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(120.0), "120.0");
        assert_eq!(format_number(87.5), "87.5");
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-3.0), "-3.0");
    }

    #[test]
    fn test_time_display() {
        assert_eq!(singapore().format(1371790800), "13:00");
        assert_eq!(TimeDisplay::from_utc_offset_hours(0).unwrap().format(1371790800), "05:00");
        assert!(TimeDisplay::from_utc_offset_hours(30).is_none());
    }

    #[test]
    fn test_rising_message() {
        let templates = MessageTemplates::new(singapore()).unwrap();
        let message = templates.render(&notification(NotificationKind::Rising, 120.0)).unwrap();
        assert_eq!(
            message,
            "The official 3-hour PSI is now 120.0 as of 13:00. \
             These alerts will continue until PSI falls below 100.0."
        );
    }

    #[test]
    fn test_sustained_message() {
        let templates = MessageTemplates::new(singapore()).unwrap();
        let message = templates.render(&notification(NotificationKind::Sustained, 143.5)).unwrap();
        assert_eq!(message, "The official 3-hour PSI is now 143.5 as of 13:00.");
    }

    #[test]
    fn test_falling_message() {
        let templates = MessageTemplates::new(singapore()).unwrap();
        let message = templates.render(&notification(NotificationKind::Falling, 90.0)).unwrap();
        assert_eq!(
            message,
            "The official 3-hour PSI is now 90.0 as of 13:00. No further alerts will be sent."
        );
    }
}
