pub mod parser;
pub mod provider;

pub use parser::parse;
pub use provider::{DataSource, ReadingProvider};
