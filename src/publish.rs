//! S3 publishing for traffic snapshots.
//!
//! The map frontend is a static page; it reads these JSON objects straight
//! from a bucket.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Serializes a value to JSON and uploads it with `application/json`
/// content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> Result<()> {
    let body = serde_json::to_vec(value)?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json")
        .send()
        .await?;

    Ok(())
}

/// Gzip-compresses a JSON payload and uploads it under `<key>.gz`.
pub async fn write_gzipped_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> Result<()> {
    let json = serde_json::to_vec(value)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    let gz_key = format!("{key}.gz");
    client
        .put_object()
        .bucket(bucket)
        .key(&gz_key)
        .body(compressed.into())
        .content_type("application/json")
        .content_encoding("gzip")
        .send()
        .await?;

    info!(bucket, key = %gz_key, "Uploaded gzipped snapshot");
    Ok(())
}
