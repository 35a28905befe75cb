//! REPL session management

use chrono::Local;
use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::input::parse_line;
use super::render::render_view;
use crate::wizard::{Edit, Stage, StageStatus, Wizard, WizardError};

/// Interactive wizard session
pub struct ReplSession {
    wizard: Wizard,
}

impl ReplSession {
    pub fn new(wizard: Wizard) -> Self {
        Self { wizard }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.show();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = format!("{} ", format!("{}>", self.wizard.stage()).bright_green());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.handle_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "AI Travel Planner".bright_cyan().bold());
        println!("Let's plan your next adventure, one step at a time.");
        println!("Model: {}", self.wizard.model().name());
        if let Some(error) = self.wizard.model().configuration_error() {
            println!("{} {}", "Configuration error:".red(), error);
            println!("{}", "Suggestions are disabled until this is fixed.".dimmed());
        }
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");
        debug!(%cmd, "ReplSession::handle_slash_command: called");

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/next" | "/n" => match self.wizard.advance() {
                Ok(_) => self.prepare().await,
                Err(e) => print_error(&e),
            },
            "/back" | "/b" => match self.wizard.go_back() {
                Ok(_) => self.prepare().await,
                Err(e) => print_error(&e),
            },
            "/retry" | "/r" => {
                println!("{}", "Asking the model again...".dimmed());
                let result = self.wizard.retry().await;
                self.report(result);
            }
            "/restart" => {
                self.wizard.start_over(Local::now().date_naive());
                println!("{}", "Started over.".dimmed());
                self.show();
            }
            "/show" | "/s" => self.show(),
            "/state" => match self.wizard.state_json() {
                Ok(json) => println!("{}", json),
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Continue to the next step", "/next".yellow());
        println!("  {:14} Go back one step (later choices are discarded)", "/back".yellow());
        println!("  {:14} Ask the model again for this step", "/retry".yellow());
        println!("  {:14} Start over with a fresh form", "/restart".yellow());
        println!("  {:14} Show the current step", "/show".yellow());
        println!("  {:14} Print the full session state as JSON", "/state".yellow());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit", "/quit".yellow());
        println!();
        println!("{}", "Input:".bright_cyan());
        println!("  {:14} Edit a form field on the first step", "key=value".yellow());
        println!("  {:14} Pick options by number", "1,3".yellow());
        println!("  {:14} Pick options for one city", "Paris=1,2".yellow());
        println!("  {:14} Turn restaurant suggestions on or off", "include=yes".yellow());
        println!("  {:14} On the plan, any other text is an adjustment request", "text".yellow());
        println!();
    }

    /// Apply a typed line to the current stage
    async fn handle_input(&mut self, input: &str) {
        let view = self.wizard.view();
        let edit = match parse_line(&view, input) {
            Ok(edit) => edit,
            Err(e) => {
                print_error(&e);
                return;
            }
        };

        let is_adjustment = matches!(edit, Edit::Adjustment(_));
        let refetch = matches!(edit, Edit::IncludeRestaurants(true));
        if let Err(e) = self.wizard.apply_edit(edit) {
            print_error(&e);
            return;
        }

        if is_adjustment {
            println!("{}", "Adjusting your plan...".dimmed());
            match self.wizard.adjust_plan().await {
                Ok(()) => {
                    println!("{}", "Plan updated.".green());
                    self.show();
                }
                Err(e) => print_error(&e),
            }
        } else if refetch {
            self.prepare().await;
        } else {
            self.show();
        }
    }

    /// Fetch whatever the new stage needs, then show it
    async fn prepare(&mut self) {
        if self.wizard.stage().uses_model() {
            println!("{}", "Thinking...".dimmed());
        }
        let result = self.wizard.prepare().await;
        self.report(result);
    }

    fn report(&self, result: Result<StageStatus, WizardError>) {
        match result {
            Ok(StageStatus::FallbackPlan { reason }) => {
                println!(
                    "{} Could not structure the itinerary ({}). Showing a summary of your selections.",
                    "!".yellow(),
                    reason
                );
            }
            Ok(StageStatus::Ready | StageStatus::Fetched) => {}
            Err(e) => print_error(&e),
        }
        self.show();
    }

    fn show(&self) {
        print!("{}", render_view(&self.wizard.view()));
        if self.wizard.stage() == Stage::GeneratePlan && self.wizard.state().plan.is_none() {
            println!("{}", "No plan yet. Use /retry to structure it.".dimmed());
        }
    }
}

fn print_error(error: &WizardError) {
    match error {
        WizardError::InvalidInput(message) => println!("{} {}", "!".yellow(), message),
        WizardError::MalformedResponse { cleaned, .. } => {
            println!("{} {}", "Error:".red(), error);
            if !cleaned.is_empty() {
                println!("{}", "Cleaned reply:".dimmed());
                println!("{}", cleaned.dimmed());
            }
        }
        _ => println!("{} {}", "Error:".red(), error),
    }
    if error.is_retryable() {
        println!("Type {} to try again.", "/retry".yellow());
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
