use crate::cli::Cli;
use crate::error::{Error, Result};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for a single invocation, built once from the command line and
/// environment and handed to the services that need them.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "{API_KEY_ENV} is not set; export it or pass --api-key"
                ))
            })?;

        let model = cli.model.trim();
        if model.is_empty() {
            return Err(Error::configuration("model name cannot be empty"));
        }

        let api_base = cli
            .api_base
            .as_deref()
            .map(|base| base.trim().trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .map(str::to_string);

        Ok(Self {
            api_key: api_key.to_string(),
            api_base,
            model: model.to_string(),
            output_dir: cli.output_dir.clone(),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
