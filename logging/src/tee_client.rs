use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

pub fn new_client() -> ClientWithMiddleware {
    let builder = ClientBuilder::new(reqwest::Client::new());
    #[cfg(feature = "tee_requests")]
    let builder = builder.with(crate::tee_middleware::TeeMiddleware::new());
    builder.build()
}
