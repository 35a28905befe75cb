//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files, one per model request.
//!
//! Template loading chain:
//! 1. `prompts.dir` from the config file (explicit override)
//! 2. `.tripwise/prompts/{name}.pmt` (user override)
//! 3. `prompts/{name}.pmt` (repo default)
//! 4. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. Each template
//! has a typed request record in [`requests`] naming its slots and the JSON
//! shape the model is asked to reply with.

pub mod embedded;
mod loader;
mod requests;

pub use loader::{PromptLoader, TemplateSource};
pub use requests::{
    AdjustPlanRequest, AttractionsRequest, CitiesRequest, ItineraryRequest, PromptRequest, RestaurantsRequest,
    TripTypeRequest,
};
