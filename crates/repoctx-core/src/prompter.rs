//! Interactive prompt handling.
//!
//! The resolver only ever asks one kind of question: pick one entry from
//! a short list. The trait is deliberately that narrow.

use anyhow::Result;

/// Trait for interactive terminal prompts.
pub trait Prompter: Send + Sync + std::fmt::Debug {
    /// Present a list of options and return the selected index.
    fn select(&self, prompt: &str, default: Option<usize>, options: &[String]) -> Result<usize>;
}

/// Dialoguer-based prompter for real terminals.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    /// Create a new prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn select(&self, prompt: &str, default: Option<usize>, options: &[String]) -> Result<usize> {
        let mut sel = dialoguer::Select::new().with_prompt(prompt).items(options);
        if let Some(d) = default {
            sel = sel.default(d);
        }
        Ok(sel.interact()?)
    }
}

/// Stub prompter for testing that replays pre-configured answers.
///
/// When the scripted answers run out, `select` falls back to the
/// default index (or 0).
#[derive(Debug, Default)]
pub struct StubPrompter {
    /// Pre-configured select answers (indexes into the options list).
    pub select_answers: std::sync::Mutex<Vec<usize>>,
}

impl Prompter for StubPrompter {
    fn select(&self, _prompt: &str, default: Option<usize>, _options: &[String]) -> Result<usize> {
        let mut answers = self
            .select_answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if answers.is_empty() {
            Ok(default.unwrap_or(0))
        } else {
            Ok(answers.remove(0))
        }
    }
}
