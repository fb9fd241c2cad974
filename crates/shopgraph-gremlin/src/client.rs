//! GremlinClient trait: the unified interface for the HTTP and WebSocket transports

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GremlinResult;
use crate::graphson;
use crate::models::{Row, Script};
use crate::traversal::Traversal;

/// Unified client interface for a Gremlin server.
///
/// Implemented by:
/// - `HttpClient`: stateless `POST /gremlin` requests
/// - `WebSocketClient`: one persistent Gremlin Server session
#[async_trait]
pub trait GremlinClient: Send + Sync {
    /// Execute a script and return its normalized result values
    async fn submit(&self, script: &Script) -> GremlinResult<Vec<Value>>;

    /// Release the underlying connection, if any
    async fn close(&self) -> GremlinResult<()>;

    /// The URL this client talks to
    fn endpoint(&self) -> &str;

    /// Execute a typed traversal
    async fn traverse(&self, traversal: &Traversal) -> GremlinResult<Vec<Value>> {
        self.submit(&traversal.build()).await
    }

    /// Execute a script and shape map results into rows
    async fn rows(&self, script: &Script) -> GremlinResult<Vec<Row>> {
        Ok(graphson::rows(self.submit(script).await?))
    }

    /// Round-trip a trivial script to prove the server is reachable
    async fn ping(&self) -> GremlinResult<()> {
        self.submit(&Script::new("g.inject(1)")).await.map(|_| ())
    }
}
