use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8082"). Each service sets its own via env.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// S3-compatible endpoint URL
    pub s3_endpoint: String,

    /// S3 region name
    #[serde(default = "default_s3_region")]
    pub s3_region: String,

    /// S3 access key ID
    pub s3_access_key: String,

    /// S3 secret access key
    pub s3_secret_key: String,

    /// Path to the ffmpeg binary used for thumbnail extraction
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Number of pipeline workers draining the in-process job queue
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8082".to_string()
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_worker_count() -> usize {
    4
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}

/// Settings subset for the analytics service, which needs neither storage
/// nor ffmpeg.
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_analytics_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,
}

fn default_analytics_bind_addr() -> String {
    "0.0.0.0:8083".to_string()
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
