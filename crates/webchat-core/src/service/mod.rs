//! Use cases.
//!
//! Services orchestrate store and gateway calls. They depend on traits
//! (ports), never on concrete infrastructure implementations.

pub mod assistant;

pub use assistant::{
    AnswerInput, AnswerOutput, AssistantService, MemoryUpdateInput, ServiceError, SuggestInput,
};
