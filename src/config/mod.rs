// src/config/mod.rs

//! Configuration loading and validation for the adapter.
//!
//! Responsibilities:
//! - Define the JSON/TOML-backed data model (`model.rs`).
//! - Locate and read the config file, apply environment overrides
//!   (`loader.rs`).
//! - Validate that the zapret directory exists and the timeouts are sane
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{install_dir, load_from_path, ConfigLoader, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
pub use model::{AdapterConfig, RawAdapterConfig};
pub use validate::validate_config;
