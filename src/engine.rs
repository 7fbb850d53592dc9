//! Engine singleton: owns the logger slot and the process-wide
//! [`EngineConfig`], the only genuinely process-global state. Everything
//! else — buffers, scenes, octrees — is owned by explicit values the
//! caller threads through their own code.

use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();
static CONFIG: OnceLock<RwLock<EngineConfig>> = OnceLock::new();

/// The two global tunables every subsystem reads off the singleton:
/// the octree's root size and the loose-octree margin ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Side length of the octree's root AABB. Default 16384.0.
    pub octree_size: f32,
    /// Loose-octree child enlargement ratio. Default 0.5.
    pub loose_ratio: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { octree_size: 16384.0, loose_ratio: 0.5 }
    }
}

/// Process-wide engine facade: logging and configuration only.
pub struct Engine;

impl Engine {
    /// Installs `config` as the process-wide configuration. Call once at
    /// startup before building a [`crate::scene::Scene`].
    pub fn initialize(config: EngineConfig) {
        let slot = CONFIG.get_or_init(|| RwLock::new(config));
        if let Ok(mut guard) = slot.write() {
            *guard = config;
        }
    }

    pub fn config() -> EngineConfig {
        *CONFIG
            .get_or_init(|| RwLock::new(EngineConfig::default()))
            .read()
            .expect("engine config lock poisoned")
    }

    /// Replaces the default console logger with a custom sink.
    pub fn set_logger(logger: Box<dyn Logger>) {
        let slot = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut guard) = slot.write() {
            *guard = logger;
        }
    }

    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let slot = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(guard) = slot.read() {
            guard.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let slot = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(guard) = slot.read() {
            guard.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
