use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::error::GenResult;

/// Asks the user questions on behalf of the driver.
///
/// `Ok(None)` means the user cancelled the prompt (Esc / Ctrl+C).
pub trait Prompter {
    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize)
        -> GenResult<Option<usize>>;

    fn confirm(&mut self, prompt: &str) -> GenResult<Option<bool>>;
}

/// Terminal prompts rendered with dialoguer.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> GenResult<Option<usize>> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .items(items)
            .interact_opt()?;
        Ok(selection)
    }

    fn confirm(&mut self, prompt: &str) -> GenResult<Option<bool>> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_opt()?;
        Ok(confirmed)
    }
}

