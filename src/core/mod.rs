pub mod config;
pub mod logo_storage;
mod responses;
mod telemetry;

pub use self::config::AppConfig;
pub use logo_storage::LogoStorage;
pub use responses::*;
pub use telemetry::*;
