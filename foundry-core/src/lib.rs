pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use application::{agent, tooling};
pub use config::{AppConfig, ConnectionDescriptor};
pub use domain::types;
pub use infrastructure::model;
