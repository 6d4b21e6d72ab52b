pub mod analysis;
pub mod format;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod transcript;
pub mod video_id;

pub use format::OutputFormat;
pub use pipeline::Job;
pub use report::AnalysisRequester;
pub use transcript::TranscriptService;
