pub mod errors;
pub mod logging;
pub mod root;
pub mod routes;
pub mod server;
pub mod upstream;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use routes::{AliasConfig, FieldConfig, PatternConfig, RegexConfig, RouteAction, RouteConfig};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
