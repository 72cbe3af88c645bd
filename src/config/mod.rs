// src/config/mod.rs
// Configuration loaded once at process start

pub mod env;

pub use env::{ApiKeys, ConfigValidation, EnvConfig, ModelConfig};
