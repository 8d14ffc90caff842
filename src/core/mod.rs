// src/core/mod.rs
//! Configuration loading and durable storage shared by every component

pub mod config_manager;
pub mod config_store;
pub mod fs_ops;

pub use config_manager::{ConfigManager, OAuthSettings, UpstreamConfig};
pub use config_store::{ConfigStore, DotenvStore, MemoryStore, StoreError};
pub use fs_ops::FsOps;
