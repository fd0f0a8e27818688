pub mod hoiio;

pub use hoiio::{HoiioGateway, SmsGateway, SmsRequest, SmsResponse, HOIIO_SMS_API, SUCCESS_STATUS};
