pub mod aggregate;
pub mod collection;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod logging;
pub mod pages;
pub mod services;
pub mod store;

pub use error::{Error, Result};

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether debug logging is active, shared between the logger filter and the settings toggle.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
