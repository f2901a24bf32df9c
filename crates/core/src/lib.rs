//! Core types and shared functionality for buildll.
//!
//! This crate provides:
//! - Content payload types for the CMS API
//! - In-memory, site-scoped content cache
//! - Unified error types
//! - Layered client configuration

pub mod cache;
pub mod config;
pub mod content;
pub mod error;

pub use cache::{CacheKey, CachedValue, Clock, ContentCache, ManualClock, SystemClock};
pub use config::{ClientConfig, ConfigError, Deployment};
pub use content::{BatchContent, BatchResult, ContentMeta, ContentResponse, ContentUpdate};
pub use error::Error;
