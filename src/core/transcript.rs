use crate::error::{Error, Result};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// Language tried after the requested one.
pub const FALLBACK_LANGUAGE: &str = "en";

/// One timed caption unit. Only the text reaches the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub language_code: String,
    /// Set when the requested language was unavailable.
    pub fallback_from: Option<String>,
    pub text: String,
}

/// Where caption data comes from.
#[allow(async_fn_in_trait)]
pub trait TranscriptSource {
    async fn available_languages(&self, video_id: &str) -> Result<Vec<String>>;

    async fn fetch_fragments(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptFragment>>;
}

#[derive(Clone)]
pub struct TranscriptService {
    api: YouTubeTranscriptApi,
}

impl TranscriptService {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| Error::custom(format!("Failed to set up transcript client: {e}")))?;
        Ok(Self { api })
    }
}

impl TranscriptSource for TranscriptService {
    async fn available_languages(&self, video_id: &str) -> Result<Vec<String>> {
        let listing = self.api.list_transcripts(video_id).await.map(|list| {
            list.transcripts()
                .map(|transcript| transcript.language_code.clone())
                .collect()
        });
        languages_from_listing(listing)
    }

    async fn fetch_fragments(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptFragment>> {
        match self.api.fetch_transcript(video_id, &[language], false).await {
            Ok(transcript) => Ok(transcript
                .snippets
                .into_iter()
                .map(|snippet| TranscriptFragment {
                    text: snippet.text,
                    start: snippet.start,
                    duration: snippet.duration,
                })
                .collect()),
            Err(e) => Err(Error::custom(format!("Failed to fetch transcript: {e}"))),
        }
    }
}

/// A video without captions lists no languages rather than failing, so the
/// caller reports it as `NoTranscriptAvailable`. Other failures pass through.
fn languages_from_listing(
    listing: std::result::Result<Vec<String>, CouldNotRetrieveTranscript>,
) -> Result<Vec<String>> {
    match listing {
        Ok(mut languages) => {
            languages.sort();
            languages.dedup();
            Ok(languages)
        }
        Err(e) => match &e.reason {
            Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled)
            | Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
                tracing::debug!(video_id = %e.video_id, "video has no transcripts");
                Ok(Vec::new())
            }
            _ => Err(Error::custom(format!("Failed to list transcripts: {e}"))),
        },
    }
}

/// Ordered languages to try, lowercased: the requested one, then the fallback.
pub fn language_candidates(requested: &str) -> Vec<String> {
    let requested = requested.trim().to_ascii_lowercase();
    let mut candidates = Vec::with_capacity(2);
    if !requested.is_empty() {
        candidates.push(requested);
    }
    if !candidates.iter().any(|c| c == FALLBACK_LANGUAGE) {
        candidates.push(FALLBACK_LANGUAGE.to_string());
    }
    candidates
}

/// The available code matching the first candidate that has one. The
/// returned code is spelled as the source lists it.
pub fn select_language<'a>(candidates: &[String], available: &'a [String]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        available
            .iter()
            .find(|a| a.eq_ignore_ascii_case(candidate))
            .map(String::as_str)
    })
}

/// Fragment texts in temporal order, joined by single spaces.
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub async fn fetch_transcript<S: TranscriptSource>(
    source: &S,
    video_id: &str,
    requested: &str,
) -> Result<Transcript> {
    let candidates = language_candidates(requested);
    let available = source.available_languages(video_id).await?;
    tracing::debug!(video_id, ?available, "transcript languages listed");

    let Some(language) = select_language(&candidates, &available) else {
        return Err(Error::no_transcript(video_id, &candidates, &available));
    };

    let fallback_from = candidates
        .first()
        .filter(|first| !first.eq_ignore_ascii_case(language))
        .map(|_| requested.trim().to_string());
    if let Some(from) = &fallback_from {
        tracing::warn!(
            video_id,
            requested = %from,
            using = language,
            "requested transcript language unavailable, falling back"
        );
    }

    let fragments = source.fetch_fragments(video_id, language).await?;
    let seconds = fragments
        .last()
        .map_or(0.0, |last| last.start + last.duration);
    tracing::info!(
        video_id,
        language,
        fragments = fragments.len(),
        seconds,
        "transcript fetched"
    );

    Ok(Transcript {
        language_code: language.to_string(),
        fallback_from,
        text: join_fragments(&fragments),
    })
}
