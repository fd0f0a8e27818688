pub mod engine;
pub mod notifier;
pub mod providers;
pub mod templates;

pub use engine::{Decision, Notification, NotificationEngine, NotificationKind};
pub use notifier::{Notifier, SendResult};
pub use providers::{HoiioGateway, SmsGateway, SmsRequest, SmsResponse};
pub use templates::{format_number, MessageTemplates, TimeDisplay};
