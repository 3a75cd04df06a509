//! Durable memory types.
//!
//! A `MemoryRecord` is one utterance tied to a user and a session. Records are
//! append-only: once written they are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Default number of records recalled per user.
pub const DEFAULT_MEMORY_LIMIT: i64 = 50;

/// Who produced a remembered utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The end user.
    User,
    /// A human support agent.
    Agent,
    /// The automated assistant.
    Bot,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::User => write!(f, "user"),
            Actor::Agent => write!(f, "agent"),
            Actor::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Actor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Actor::User),
            "agent" => Ok(Actor::Agent),
            "bot" => Ok(Actor::Bot),
            other => Err(format!("invalid actor: '{other}'")),
        }
    }
}

/// One durable utterance for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub user_id: String,
    pub session_id: String,
    pub actor: Actor,
    /// Stored verbatim; never blank.
    pub text: String,
    pub created_at: DateTime<Utc>,
}
