use derive_more::{Display, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("Invalid input: {_0}")]
    InvalidInput(String),

    #[display(
        "No transcript available for video {video_id} in [{requested}]; available languages: [{available}]"
    )]
    NoTranscriptAvailable {
        video_id: String,
        requested: String,
        available: String,
    },

    #[display("Analysis request failed: {_0}")]
    AnalysisRequestFailed(String),

    #[display("Configuration error: {_0}")]
    ConfigurationError(String),

    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    #[display("{_0}")]
    #[from(String, &String, &str)]
    Custom(String),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }

    pub fn invalid_input(val: impl std::fmt::Display) -> Self {
        Self::InvalidInput(val.to_string())
    }

    pub fn analysis(val: impl std::fmt::Display) -> Self {
        Self::AnalysisRequestFailed(val.to_string())
    }

    pub fn configuration(val: impl std::fmt::Display) -> Self {
        Self::ConfigurationError(val.to_string())
    }

    pub fn no_transcript(video_id: &str, requested: &[String], available: &[String]) -> Self {
        let available = if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        };
        Self::NoTranscriptAvailable {
            video_id: video_id.to_string(),
            requested: requested.join(", "),
            available,
        }
    }

    /// Every handled failure maps to the same non-zero status.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl std::error::Error for Error {}
