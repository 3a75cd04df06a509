//! Postgres storage layer, used in production deployments.

pub mod memory;
