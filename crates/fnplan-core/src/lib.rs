pub mod config;
pub mod descriptor;
pub mod error;
pub mod ids;
pub mod schedule;

pub use config::*;
pub use descriptor::*;
pub use error::{ConfigError, ConfigResult};
pub use schedule::{CronOptions, Schedule};
