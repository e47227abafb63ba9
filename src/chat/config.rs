//! Command-line arguments for the chat front-end.
//!
//! Arguments are parsed with `arrrg` and folded into a [`ConfigLoader`], so
//! `/reload` re-reads the same file with the same overrides.

use arrrg_derive::CommandLine;

use crate::config::{ConfigLoader, ConfigOverrides};

/// Command-line arguments for the geminius-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Configuration file to read instead of the default location.
    #[arrrg(optional, "Path to the YAML configuration file", "PATH")]
    pub config: Option<String>,

    /// Model to use for generation.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Language answers are requested in.
    #[arrrg(optional, "Language for answers (default: English)", "LANGUAGE")]
    pub language: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

impl ChatArgs {
    /// Whether output should be styled.
    pub fn use_color(&self) -> bool {
        !self.no_color
    }

    /// The loader described by these arguments.
    pub fn loader(&self) -> ConfigLoader {
        let loader = match &self.config {
            Some(path) => ConfigLoader::with_path(path),
            None => ConfigLoader::new(),
        };
        loader.with_overrides(ConfigOverrides {
            model: self.model.clone(),
            language: self.language.clone(),
        })
    }
}
