//! tickit - a to-do list manager
//!
//! This library provides the core functionality for the tickit CLI: an
//! in-memory task store mirrored to a local key-value store, a filter and sort
//! policy, and a render contract shared by the plain-text and terminal views.
//!
//! # Core Concepts
//!
//! - **Task store**: the authoritative, insertion-ordered list of tasks
//! - **Storage adapter**: the whole list as one JSON array under a single key
//! - **Filter & sort**: overdue first, then by due date, then newest first
//! - **Command handlers**: mutate, save, recompute, re-render
//! - **Notices**: short-lived feedback messages with cancellation handles
//!
//! # Module Organization
//!
//! - `app`: Command handlers and the edit session
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tickit.toml`
//! - `error`: Error types and result aliases
//! - `filter`: Filter modes and the sort comparator
//! - `lock`: File locking and atomic writes
//! - `notice`: Notice queue
//! - `output`: Human and JSON output envelopes
//! - `render`: List view model and plain-text rendering
//! - `storage`: Key-value backends and the task list adapter
//! - `store`: In-memory task store
//! - `task`: Task record and field parsing
//! - `ui`: Interactive terminal view

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lock;
pub mod notice;
pub mod output;
pub mod render;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
