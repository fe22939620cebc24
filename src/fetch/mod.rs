mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::debug;

/// Issues a GET for `url` through the given client and returns the body.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL: {url}"))?,
    );

    let resp = client.execute(req).await?;
    let status = resp.status();
    let body = resp.bytes().await?;
    debug!(%url, %status, bytes = body.len(), "Fetched document");
    Ok(body)
}
