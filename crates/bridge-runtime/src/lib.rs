//! # Bridge Runtime Library
//!
//! Configuration loading and the runtime that wires the signal relay and
//! the host catalog into one HTTP listener. The entry point is the
//! `hostbridge` binary in `main.rs`.

#![allow(missing_docs)]

pub mod config;
pub mod runtime;

pub use config::{load_config, load_config_with, BridgeConfig, LoadError};
pub use runtime::BridgeRuntime;
