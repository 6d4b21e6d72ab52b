use crate::core::format::OutputFormat;
use crate::core::report::Analyzer;
use crate::core::storage::StorageService;
use crate::core::transcript::{self, TranscriptSource};
use crate::core::video_id::{VideoId, canonical_url, extract_video_id};
use crate::error::Result;
use std::path::PathBuf;

/// One summarization request.
#[derive(Debug, Clone)]
pub struct Job {
    pub url: String,
    pub format: OutputFormat,
    pub language: String,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub struct Outcome {
    pub video_id: VideoId,
    pub path: PathBuf,
    pub rendered: String,
}

/// Extract id, fetch transcript, request analysis, render, write. Nothing
/// touches the output directory until every earlier step has succeeded.
pub async fn run<S, A>(job: &Job, source: &S, analyzer: &A) -> Result<Outcome>
where
    S: TranscriptSource,
    A: Analyzer,
{
    let video_id = extract_video_id(&job.url)?;
    tracing::info!(video_id = %video_id, "processing video");

    let transcript = transcript::fetch_transcript(source, video_id.as_str(), &job.language).await?;
    tracing::info!(
        language = %transcript.language_code,
        fallback_from = ?transcript.fallback_from,
        chars = transcript.text.len(),
        "transcript ready"
    );

    let video_url = canonical_url(&job.url, &video_id);
    let analysis = analyzer.analyze(&transcript.text, &video_url).await?;

    let rendered = job.format.render(&analysis)?;
    let path =
        StorageService::save_analysis(&job.output_dir, &video_id, job.format, &rendered).await?;

    Ok(Outcome {
        video_id,
        path,
        rendered,
    })
}
