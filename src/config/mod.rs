#[cfg(feature = "cli")]
pub mod cli;
pub mod rawg_config;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use rawg_config::RawgConfig;
pub use toml_config::TomlConfig;
