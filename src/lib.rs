pub mod browser;
pub mod config;
pub mod logging;
pub mod runner;

pub use config::{ConfigError, VerifyConfig};
pub use runner::{run, VerifyError, VerifyReport};
