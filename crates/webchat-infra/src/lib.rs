//! Infrastructure layer for the WebChat AI core.
//!
//! Implements the ports defined in `webchat-core`: SQLite and Postgres memory
//! stores, the OpenAI and HTTP agent-runtime gateways, database URL
//! normalization, and environment configuration.

pub mod agent;
pub mod config;
pub mod db_url;
pub mod postgres;
pub mod sqlite;
pub mod store;
