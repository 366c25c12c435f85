use http::Extensions;
use reqwest::{Client, Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use std::env;

pub fn tee_server_url() -> String {
    env::var("GHOSTWRITER_TEE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Mirrors every request to the tee server before letting it continue to the
/// real endpoint. The mirrored copy is fire-and-forget; a dead tee server must
/// never slow down or fail LLM traffic.
pub struct TeeMiddleware {
    tee_client: Client,
}

impl TeeMiddleware {
    pub fn new() -> Self {
        Self {
            tee_client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Middleware for TeeMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let tee_url = format!("{}/ghostwriter_request{}", tee_server_url(), req.url().path());

        let body_bytes = req.try_clone().and_then(|cloned| {
            cloned
                .body()
                .and_then(|body| body.as_bytes().map(|bytes| bytes.to_vec()))
        });

        let upstream = req.url().host_str().unwrap_or("none").to_string();
        let mut tee_request = self
            .tee_client
            .request(req.method().clone(), tee_url)
            .headers(req.headers().clone())
            .header("x-upstream-host", upstream);
        if let Some(bytes) = body_bytes {
            tee_request = tee_request.body(bytes);
        }

        tokio::spawn(async move {
            let _ = tee_request.send().await;
        });

        next.run(req, extensions).await
    }
}
