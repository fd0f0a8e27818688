pub mod app;
pub mod cli;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod notification;
pub mod reading;
pub mod state;

pub use app::{App, RunOptions, RunOutcome};
pub use infrastructure::{AlertError, RunLogger};
