//! logdeck - state core for a desktop log viewer
//!
//! This library provides the non-visual pieces a log viewer is built on: an
//! observable preference store, the severity threshold scale, and the
//! listener-notified message log fed by the process's own logging.

pub mod app;
pub mod config;
pub mod events;
pub mod logging;
pub mod messages;
pub mod preferences;
pub mod severity;
pub mod threshold;
