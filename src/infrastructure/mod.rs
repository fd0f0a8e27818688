pub mod error;
pub mod logging;
pub mod network;

pub use error::{AlertError, ErrorCategory};
pub use logging::{setup_logging, LogFormat, LogOutput, LoggingConfig, RunLogger};
pub use network::{NetworkConfig, NetworkManager};
