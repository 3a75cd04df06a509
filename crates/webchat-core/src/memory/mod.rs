//! Durable user memory: the store port and prompt rendering.

pub mod formatter;
pub mod store;
