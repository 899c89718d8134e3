//! Keybind system for interactive browse mode.
//!
//! This module provides customizable keyboard shortcuts for working the
//! catalog browser: paging, filter pickers, sorting, sharing. Query editing
//! and list navigation stay hardwired in the UI event loop.

pub mod actions;
pub mod config;
pub mod help;
pub mod metadata;

pub use actions::BrowseAction;
pub use config::{KeybindConfig, KeybindDef};
pub use metadata::{ActionMetadata, ActionRegistry};
