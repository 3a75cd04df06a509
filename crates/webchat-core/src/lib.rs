//! Business logic for the WebChat AI core.
//!
//! This crate defines the "ports" (`MemoryStore`, `AgentGateway`) that the
//! infrastructure layer implements, plus the pure prompt and normalization
//! logic. It depends only on `webchat-types`, never on `webchat-infra` or any
//! database/IO crate.

pub mod agent;
pub mod memory;
pub mod prompt;
pub mod response;
pub mod service;
pub mod suggest;
