//! Interactive terminal wizard
//!
//! Renders each stage as text, reads `key=value` edits, option numbers and
//! slash commands, and drives the [`Wizard`](crate::wizard::Wizard).

mod input;
mod render;
mod session;

pub use input::parse_line;
pub use render::render_view;
pub use session::ReplSession;

use chrono::Local;
use eyre::Result;
use tracing::info;

use crate::config::Config;
use crate::model::ModelClient;
use crate::prompts::PromptLoader;
use crate::wizard::Wizard;

/// Run the interactive wizard
///
/// This is the main entry point for `tw plan`. A missing API key does not stop
/// the wizard; it is reported once and model-backed steps fail until fixed.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let model = ModelClient::from_config(&config.llm);
    let prompts = PromptLoader::from_config(&config.prompts);
    let wizard = Wizard::new(model, prompts, config.wizard.clone(), Local::now().date_naive());

    info!("Starting interactive wizard");
    let mut session = ReplSession::new(wizard);
    session.run().await
}
