//! Agent gateway abstractions.
//!
//! - `AgentGateway`: RPITIT trait for concrete agent runtimes
//! - `BoxAgentGateway`: object-safe wrapper for runtime backend selection

pub mod box_gateway;
pub mod gateway;
