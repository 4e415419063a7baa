//! Video platform backend services.
//!
//! One library shared by two binaries: the processor service (post-upload
//! thumbnail pipeline) and the analytics API (per-video engagement
//! counters). Both sit on the same PostgreSQL database; the processor also
//! talks to S3-compatible object storage and shells out to ffmpeg.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
