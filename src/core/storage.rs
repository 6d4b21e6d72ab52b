use crate::core::format::OutputFormat;
use crate::core::video_id::VideoId;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct StorageService;

impl StorageService {
    /// `<dir>/<video-id>.<extension>`
    pub fn output_path(dir: &Path, video_id: &VideoId, format: OutputFormat) -> PathBuf {
        dir.join(format!("{video_id}.{}", format.extension()))
    }

    /// Writes the rendered analysis, creating the directory if needed. The
    /// content goes to a temporary sibling first so a failed write never
    /// leaves a truncated file at the final path.
    pub async fn save_analysis(
        dir: &Path,
        video_id: &VideoId,
        format: OutputFormat,
        content: &str,
    ) -> Result<PathBuf> {
        let path = Self::output_path(dir, video_id, format);
        fs::create_dir_all(dir).await?;

        let tmp = path.with_extension(format!("{}.tmp", format.extension()));
        let written = match fs::write(&tmp, content).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), "analysis saved");
        Ok(path)
    }
}
