//! Configuration for the snapshot commands: TOML file, `-S` overrides and CLI flags
//! merged over built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
