//! WebSocketClient: persistent Gremlin Server session
//!
//! Speaks the Gremlin Server WebSocket protocol: each request is one binary
//! frame carrying a mime-type prefix and a JSON request message; the server
//! answers with one or more response frames for the same request id.

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::GremlinClient;
use crate::error::{GremlinError, GremlinResult};
use crate::graphson;
use crate::models::{status, Credentials, ResponseMessage, Script};

/// Serializer announced in every request frame
pub const MIME_TYPE: &str = "application/vnd.gremlin-v3.0+json";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client holding one WebSocket session to a Gremlin server.
///
/// Requests are serialized through a mutex; the session is never pipelined.
pub struct WebSocketClient {
    url: String,
    session: Mutex<Option<WsStream>>,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl WebSocketClient {
    /// Open a session to the given `ws://` or `wss://` URL.
    pub async fn connect(
        url: &str,
        timeout: Duration,
        credentials: Option<Credentials>,
    ) -> GremlinResult<Self> {
        let (stream, _response) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| GremlinError::Connection(format!("timed out connecting to {}", url)))??;

        info!("WebSocket session open to {}", url);

        Ok(Self {
            url: url.to_string(),
            session: Mutex::new(Some(stream)),
            credentials,
            timeout,
        })
    }

    async fn next_response(&self, stream: &mut WsStream, request_id: &str) -> GremlinResult<ResponseMessage> {
        loop {
            let frame = tokio::time::timeout(self.timeout, stream.next())
                .await
                .map_err(|_| GremlinError::Connection("timed out waiting for response".to_string()))?;

            let message: ResponseMessage = match frame {
                Some(Ok(Message::Text(text))) => serde_json::from_str(&text)?,
                Some(Ok(Message::Binary(bytes))) => serde_json::from_slice(&bytes)?,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(GremlinError::Connection("server closed the session".to_string()));
                }
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            };

            match graphson::normalize(message.request_id.clone()) {
                Value::String(id) if id != request_id => {
                    warn!("Dropping response for unknown request {}", id);
                    continue;
                }
                _ => return Ok(message),
            }
        }
    }

    fn sasl_args(&self) -> GremlinResult<Value> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            GremlinError::Config("server requires authentication but no credentials are configured".to_string())
        })?;
        let token = BASE64_STANDARD.encode(format!("\0{}\0{}", creds.username, creds.password));
        Ok(json!({ "sasl": token, "saslMechanism": "PLAIN" }))
    }
}

/// Build one request frame: `<mime length><mime type><request JSON>`
pub fn request_frame(request_id: &str, op: &str, args: Value) -> GremlinResult<Vec<u8>> {
    let message = json!({
        "requestId": { "@type": "g:UUID", "@value": request_id },
        "op": op,
        "processor": "",
        "args": args,
    });
    let body = serde_json::to_vec(&message)?;

    let mut frame = Vec::with_capacity(1 + MIME_TYPE.len() + body.len());
    frame.push(MIME_TYPE.len() as u8);
    frame.extend_from_slice(MIME_TYPE.as_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Arguments of an `eval` op
pub fn eval_args(script: &Script) -> Value {
    json!({
        "gremlin": script.text,
        "bindings": script.bindings,
        "language": "gremlin-groovy",
        "aliases": { "g": "g" },
    })
}

#[async_trait]
impl GremlinClient for WebSocketClient {
    async fn submit(&self, script: &Script) -> GremlinResult<Vec<Value>> {
        let mut session = self.session.lock().await;
        let stream = session
            .as_mut()
            .ok_or_else(|| GremlinError::Connection("session is closed".to_string()))?;

        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, script = %script.text, "eval");
        let frame = request_frame(&request_id, "eval", eval_args(script))?;
        stream.send(Message::Binary(frame)).await?;

        let mut values = Vec::new();
        loop {
            let response = self.next_response(stream, &request_id).await?;
            match response.status.code {
                status::PARTIAL_CONTENT => {
                    values.extend(graphson::result_values(response.result.data));
                }
                status::SUCCESS | status::NO_CONTENT => {
                    values.extend(graphson::result_values(response.result.data));
                    return Ok(values);
                }
                status::AUTHENTICATE => {
                    debug!(request_id = %request_id, "SASL challenge");
                    let frame = request_frame(&request_id, "authentication", self.sasl_args()?)?;
                    stream.send(Message::Binary(frame)).await?;
                }
                code => {
                    return Err(GremlinError::Server {
                        code,
                        message: response.status.message,
                    });
                }
            }
        }
    }

    async fn close(&self) -> GremlinResult<()> {
        if let Some(mut stream) = self.session.lock().await.take() {
            stream.close(None).await?;
            info!("WebSocket session to {} closed", self.url);
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_frame_layout() {
        let frame = request_frame("abc", "eval", json!({"gremlin": "g.V().count()"})).unwrap();
        assert_eq!(frame[0] as usize, MIME_TYPE.len());
        assert_eq!(&frame[1..1 + MIME_TYPE.len()], MIME_TYPE.as_bytes());

        let body: Value = serde_json::from_slice(&frame[1 + MIME_TYPE.len()..]).unwrap();
        assert_eq!(body["requestId"]["@value"], "abc");
        assert_eq!(body["op"], "eval");
        assert_eq!(body["processor"], "");
        assert_eq!(body["args"]["gremlin"], "g.V().count()");
    }

    #[test]
    fn test_eval_args_carry_bindings() {
        let script = Script::new("g.V().has('user','userId',uid)").bind("uid", "user1");
        let args = eval_args(&script);
        assert_eq!(args["bindings"]["uid"], "user1");
        assert_eq!(args["language"], "gremlin-groovy");
    }
}
