use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::image_client::TryOnGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Holds the per-garment generation locks for AI try-on.
    pub redis: RedisClient,
    pub s3: S3Client,
    pub config: Config,
    /// Backend that dresses a client photo with a garment. Default: Gemini.
    pub generator: Arc<dyn TryOnGenerator>,
}
