// src/lib.rs
// EstateOS AI - intent-routed chat, schematic and report generation

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod report;
pub mod web;

pub use error::{ChatError, GatewayError, Result};
