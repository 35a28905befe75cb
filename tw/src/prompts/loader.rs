//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use super::requests::PromptRequest;
use crate::config::PromptsConfig;

/// Where a template was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// `prompts.dir` from the config file
    Override(PathBuf),
    /// `.tripwise/prompts/`
    User(PathBuf),
    /// `prompts/`
    Repo(PathBuf),
    /// Compiled into the binary
    Embedded,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Override(path) => write!(f, "override {}", path.display()),
            TemplateSource::User(path) => write!(f, "user {}", path.display()),
            TemplateSource::Repo(path) => write!(f, "repo {}", path.display()),
            TemplateSource::Embedded => write!(f, "embedded"),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine (strict, no HTML escaping)
    hbs: Handlebars<'static>,
    /// Configured override directory
    override_dir: Option<PathBuf>,
    /// User override directory (e.g., `.tripwise/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `root`
    ///
    /// `root` is searched for `.tripwise/prompts/` and `prompts/`; directories
    /// that do not exist are skipped.
    pub fn new(root: impl AsRef<Path>, override_dir: Option<PathBuf>) -> Self {
        let root = root.as_ref();
        debug!(?root, ?override_dir, "PromptLoader::new: called");
        let user_dir = root.join(".tripwise/prompts");
        let repo_dir = root.join("prompts");

        let override_dir = override_dir.filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                debug!(?dir, "PromptLoader::new: override directory missing, ignoring");
            }
            exists
        });

        Self {
            hbs: Self::engine(),
            override_dir,
            user_dir: user_dir.is_dir().then_some(user_dir),
            repo_dir: repo_dir.is_dir().then_some(repo_dir),
        }
    }

    /// Loader for the current directory and the configured override
    pub fn from_config(config: &PromptsConfig) -> Self {
        debug!("PromptLoader::from_config: called");
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(root, config.dir.clone())
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
            user_dir: None,
            repo_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Where `name` would be loaded from, or `None` if it exists nowhere
    pub fn source(&self, name: &str) -> Option<TemplateSource> {
        debug!(%name, "PromptLoader::source: called");
        let file = format!("{}.pmt", name);
        let on_disk = |dir: &Option<PathBuf>| dir.as_ref().map(|d| d.join(&file)).filter(|p| p.exists());

        if let Some(path) = on_disk(&self.override_dir) {
            return Some(TemplateSource::Override(path));
        }
        if let Some(path) = on_disk(&self.user_dir) {
            return Some(TemplateSource::User(path));
        }
        if let Some(path) = on_disk(&self.repo_dir) {
            return Some(TemplateSource::Repo(path));
        }
        embedded::get_embedded(name).map(|_| TemplateSource::Embedded)
    }

    /// Every known template with the place it loads from
    pub fn list(&self) -> Vec<(&'static str, TemplateSource)> {
        embedded::TEMPLATE_NAMES
            .iter()
            .map(|name| (*name, self.source(name).unwrap_or(TemplateSource::Embedded)))
            .collect()
    }

    /// Load a template by name (without .pmt extension)
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        match self.source(name) {
            Some(TemplateSource::Embedded) => embedded::get_embedded(name)
                .map(str::to_string)
                .ok_or_else(|| eyre!("Prompt template not found: {}", name)),
            Some(TemplateSource::Override(path) | TemplateSource::User(path) | TemplateSource::Repo(path)) => {
                debug!(?path, "PromptLoader::load_template: reading from disk");
                std::fs::read_to_string(&path).map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e))
            }
            None => {
                debug!(%name, "PromptLoader::load_template: not found anywhere");
                Err(eyre!("Prompt template not found: {}", name))
            }
        }
    }

    /// Render a template with the given context
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the template belonging to a typed request
    pub fn render_request<R: PromptRequest>(&self, request: &R) -> Result<String> {
        self.render(R::TEMPLATE, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Adjust<'a> {
        current_plan_json: &'a str,
        user_request: &'a str,
    }

    #[test]
    fn test_embedded_only_lists_all_embedded() {
        let loader = PromptLoader::embedded_only();
        let listed = loader.list();

        assert_eq!(listed.len(), 6);
        assert!(listed.iter().all(|(_, source)| *source == TemplateSource::Embedded));
    }

    #[test]
    fn test_render_does_not_escape() {
        let loader = PromptLoader::embedded_only();
        let ctx = Adjust {
            current_plan_json: r#"{"general_notes":"<b>&</b>","itinerary_days":[]}"#,
            user_request: "Add \"Louvre\" & more",
        };

        let prompt = loader.render("adjust-plan", &ctx).unwrap();
        assert!(prompt.contains(r#"{"general_notes":"<b>&</b>","itinerary_days":[]}"#));
        assert!(prompt.contains("\"Add \"Louvre\" & more\""));
    }

    #[test]
    fn test_render_strict_rejects_missing_slot() {
        let loader = PromptLoader::embedded_only();
        #[derive(Serialize)]
        struct Partial {
            user_request: String,
        }

        let result = loader.render(
            "adjust-plan",
            &Partial {
                user_request: "x".into(),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_override_chain() {
        let root = TempDir::new().unwrap();
        let repo = root.path().join("prompts");
        let user = root.path().join(".tripwise/prompts");
        let custom = TempDir::new().unwrap();
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::create_dir_all(&user).unwrap();

        std::fs::write(repo.join("cities.pmt"), "repo cities").unwrap();
        std::fs::write(repo.join("attractions.pmt"), "repo attractions").unwrap();
        std::fs::write(user.join("attractions.pmt"), "user attractions").unwrap();
        std::fs::write(custom.path().join("itinerary.pmt"), "custom itinerary").unwrap();

        let loader = PromptLoader::new(root.path(), Some(custom.path().to_path_buf()));

        assert_eq!(loader.load_template("cities").unwrap(), "repo cities");
        assert_eq!(loader.load_template("attractions").unwrap(), "user attractions");
        assert_eq!(loader.load_template("itinerary").unwrap(), "custom itinerary");
        assert!(matches!(loader.source("itinerary"), Some(TemplateSource::Override(_))));
        assert_eq!(loader.source("trip-types"), Some(TemplateSource::Embedded));
    }

    #[test]
    fn test_missing_override_dir_is_ignored() {
        let root = TempDir::new().unwrap();
        let loader = PromptLoader::new(root.path(), Some(root.path().join("nope")));
        assert_eq!(loader.source("cities"), Some(TemplateSource::Embedded));
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
        assert!(loader.source("nonexistent-template").is_none());
    }
}
