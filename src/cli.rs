use crate::core::video_id::strip_quotes;
use crate::config::API_KEY_ENV;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-5-mini";

#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(about = "Summarize a video's transcript into markdown or JSON")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Video URL or video ID
    #[arg(value_parser = parse_video_url)]
    pub url: String,

    /// Output format: 'md' or 'json'
    #[arg(short, long, default_value = "md")]
    pub format: String,

    /// Model to use for analysis
    #[arg(short, long, env = "VIDSUM_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Preferred transcript language
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Directory the analysis file is written to
    #[arg(short, long, env = "VIDSUM_OUTPUT_DIR", default_value = "transcript")]
    pub output_dir: PathBuf,

    /// API key for the generative-language service
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an endpoint serving the OpenAI Responses API
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_video_url(raw: &str) -> Result<String, String> {
    Ok(strip_quotes(raw).to_string())
}
