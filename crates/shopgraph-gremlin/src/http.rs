//! HttpClient: stateless client for a Gremlin server's HTTP endpoint
//!
//! Each script is one `POST /gremlin` with a JSON body.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::client::GremlinClient;
use crate::error::{GremlinError, GremlinResult};
use crate::graphson;
use crate::models::{Credentials, HttpRequest, ResponseMessage, Script};

/// Network client that posts scripts to a Gremlin HTTP endpoint.
pub struct HttpClient {
    url: String,
    http_client: Client,
    credentials: Option<Credentials>,
}

impl HttpClient {
    /// Create a client for the given `/gremlin` URL.
    ///
    /// # Example
    /// ```no_run
    /// # use shopgraph_gremlin::HttpClient;
    /// # use std::time::Duration;
    /// let client = HttpClient::new("http://localhost:8182/gremlin", Duration::from_secs(30), None).unwrap();
    /// ```
    pub fn new(url: &str, timeout: Duration, credentials: Option<Credentials>) -> GremlinResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GremlinError::Config(e.to_string()))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            credentials,
        })
    }

    async fn post_script(&self, script: &Script) -> GremlinResult<Value> {
        let body = HttpRequest {
            gremlin: &script.text,
            bindings: &script.bindings,
        };
        debug!(url = %self.url, script = %script.text, "POST gremlin");

        let mut request = self.http_client.post(&self.url).json(&body);
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // Gremlin Server reports failures as {"message": "..."}
            let error_body: Value = response
                .json()
                .await
                .unwrap_or_else(|_| serde_json::json!({ "message": "Unknown error" }));
            let message = error_body
                .get("message")
                .or_else(|| error_body.pointer("/status/message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(GremlinError::Server {
                code: status.as_u16(),
                message,
            });
        }

        let message: ResponseMessage = response.json().await?;
        if message.status.code >= 300 {
            return Err(GremlinError::Server {
                code: message.status.code,
                message: message.status.message,
            });
        }
        Ok(message.result.data)
    }
}

#[async_trait]
impl GremlinClient for HttpClient {
    async fn submit(&self, script: &Script) -> GremlinResult<Vec<Value>> {
        let data = self.post_script(script).await?;
        Ok(graphson::result_values(data))
    }

    async fn close(&self) -> GremlinResult<()> {
        // Nothing held open between requests
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
