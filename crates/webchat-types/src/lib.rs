//! Shared domain types for the WebChat AI core.
//!
//! Memory records, conversation turns, agent run results and the error
//! types shared by the core and infrastructure crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod error;
pub mod memory;
