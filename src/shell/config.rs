//! Shell Configuration

/// Shell configuration
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Prompt printed before each input line
    pub prompt: String,

    /// Sweep expired records after this many commands (0 = disabled)
    pub sweep_interval: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "recstore> ".to_string(),
            sweep_interval: 0,
        }
    }
}

impl ShellConfig {
    /// Set the prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the automatic sweep interval, in commands
    pub fn with_sweep_interval(mut self, commands: u64) -> Self {
        self.sweep_interval = commands;
        self
    }
}
