use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Output dimensions, matching what the dashboard renders.
const THUMBNAIL_SIZE: &str = "320:240";

/// Seek offset of the representative frame, in seconds.
const FRAME_OFFSET_SECS: &str = "1";

/// Contract the pipeline holds against the external transform tool: derive
/// exactly one output artifact from the input file.
#[async_trait]
pub trait ThumbnailExtractor: Send + Sync {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), ThumbnailError>;
}

/// Extracts a single still frame by shelling out to ffmpeg.
pub struct FfmpegThumbnailer {
    ffmpeg_path: String,
}

impl FfmpegThumbnailer {
    pub fn new(ffmpeg_path: &str) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.to_string(),
        }
    }
}

#[async_trait]
impl ThumbnailExtractor for FfmpegThumbnailer {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), ThumbnailError> {
        let result = Command::new(&self.ffmpeg_path)
            .arg("-ss")
            .arg(FRAME_OFFSET_SECS)
            .arg("-i")
            .arg(input)
            .arg("-vframes")
            .arg("1")
            .arg("-vf")
            .arg(format!("scale={}", THUMBNAIL_SIZE))
            .arg("-y")
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).into_owned();
            return Err(ThumbnailError::Ffmpeg(stderr));
        }

        // ffmpeg can exit zero without emitting a frame (e.g., a stream with
        // no video track), so a missing output file is still a failure.
        if !tokio::fs::try_exists(output).await? {
            return Err(ThumbnailError::NoOutput);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("failed to invoke ffmpeg: {0}")]
    Io(#[from] std::io::Error),

    #[error("ffmpeg exited with an error: {0}")]
    Ffmpeg(String),

    #[error("ffmpeg produced no output frame")]
    NoOutput,
}
