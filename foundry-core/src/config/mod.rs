pub mod app;
pub mod connection;
pub mod error;
pub mod launch;
pub mod loader;

pub use app::AppConfig;
pub use connection::ConnectionDescriptor;
pub use error::ConfigError;
pub use launch::{Browser, LaunchOptions};
pub use loader::{ensure_env_loaded, load_env_file, load_requested_env};
