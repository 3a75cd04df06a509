//! REST API handler modules, one per `/ai/*` endpoint family.

pub mod answer;
pub mod health;
pub mod memory;
pub mod suggest;
