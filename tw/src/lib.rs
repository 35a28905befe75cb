//! Tripwise - step-by-step travel planning wizard
//!
//! A trip is planned in six stages: the traveller's inputs, a trip type, cities,
//! attractions, optional restaurants, and finally a day-by-day itinerary that
//! can be adjusted in free text. Each suggestion stage asks a language model
//! for structured JSON and caches the reply until the inputs it depends on change.
//!
//! # Modules
//!
//! - [`wizard`] - Stage state machine, edits, and render-ready views
//! - [`model`] - Model client: one prompt in, cleaned and parsed JSON out
//! - [`prompts`] - Prompt templates and the typed requests that fill them
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`domain`] - Trip inputs, selections, suggestions, and the plan
//! - [`repl`] - Interactive terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod model;
pub mod prompts;
pub mod repl;
pub mod wizard;

// Re-export commonly used types
pub use config::{Config, LlmConfig, WizardConfig};
pub use domain::{DayPlan, Plan, Selections, Suggestions, TripInputs};
pub use llm::{GeminiClient, GenerateRequest, GenerateResponse, LlmClient, LlmError};
pub use model::{ModelClient, ModelError, ModelReply, clean_json};
pub use prompts::{PromptLoader, TemplateSource};
pub use wizard::{Edit, Stage, StageStatus, StageView, Wizard, WizardError, WizardState};
