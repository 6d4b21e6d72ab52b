use crate::error::{Error, Result};
use derive_more::Display;
use regex::Regex;
use std::sync::LazyLock;

static VIDEO_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/|youtube\.com/(?:shorts|embed|live)/)([A-Za-z0-9_-]{11})",
    )
    .expect("video URL pattern is valid")
});

static BARE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// An identifier that matched one of the URL patterns: exactly 11 characters
/// from `[A-Za-z0-9_-]`, so it is safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{_0}")]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for VideoId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Strips stray quote characters a shell or copy-paste may leave around a URL.
pub fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Extracts the 11-character video identifier from a watch URL, a short link,
/// a shorts/embed/live path, or a bare identifier.
pub fn extract_video_id(url: &str) -> Result<VideoId> {
    let url = url.trim();

    if BARE_ID_REGEX.is_match(url) {
        return Ok(VideoId(url.to_string()));
    }

    VIDEO_URL_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
        .ok_or_else(|| Error::invalid_input(format!("no video identifier found in '{url}'")))
}

/// The URL handed to the model: the original one, or the canonical watch URL
/// when only an identifier was supplied.
pub fn canonical_url(input: &str, video_id: &VideoId) -> String {
    if input.trim() == video_id.as_str() {
        format!("https://www.youtube.com/watch?v={video_id}")
    } else {
        input.trim().to_string()
    }
}
