//! Model Client
//!
//! `invoke(prompt, expect_json)` over an [`LlmClient`](crate::llm::LlmClient):
//! one remote call, code-fence and trailing-comma cleanup, JSON parsing, and
//! shape validation against the typed reply a prompt asks for.

mod cleanup;
mod client;
mod error;

pub use cleanup::clean_json;
pub use client::{ModelClient, ModelReply};
pub use error::ModelError;
