use async_trait::async_trait;
use reqwest::{Request, Response};

/// Abstraction over HTTP execution so tests and future authenticated
/// sources can wrap or replace the underlying client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
