use reqwest::header::{HeaderValue, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::SyncError;

use super::{ApiRequest, ApiResponse, Transport};

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SyncError::config(format!("Failed to initialize http client: {e}")))?;
        Ok(Self { client })
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, SyncError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::network(
                    "The server took too long to respond. Check your connection and try again.",
                )
            } else {
                SyncError::network("Could not reach the pantry server.")
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|_| {
            SyncError::network("The connection dropped while reading the response.")
        })?;
        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, SyncError>> + Send {
        self.execute(request)
    }
}
