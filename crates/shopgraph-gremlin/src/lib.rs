//! shopgraph-gremlin: Gremlin client library
//!
//! Provides two client implementations:
//!
//! - **`HttpClient`**: posts scripts to a Gremlin server's `/gremlin` HTTP
//!   endpoint. Stateless; nothing to tear down.
//!
//! - **`WebSocketClient`**: holds one Gremlin Server WebSocket session, with
//!   partial-response reassembly and SASL PLAIN authentication.
//!
//! Both implement the `GremlinClient` trait for a unified API. Queries are
//! built either with the typed [`traversal`] builder or as raw [`Script`]s;
//! in both cases parameters travel as bindings.
//!
//! # Quick Start
//!
//! ```no_run
//! use shopgraph_gremlin::{GremlinClient, HttpClient};
//! use shopgraph_gremlin::traversal::g;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = HttpClient::new("http://localhost:8182/gremlin", Duration::from_secs(30), None)
//!         .unwrap();
//!
//!     let count = client.traverse(&g().v().has_label("user").count())
//!         .await.unwrap();
//!     println!("{:?} users", count);
//! }
//! ```

pub mod client;
pub mod error;
pub mod graphson;
pub mod http;
pub mod models;
pub mod traversal;
pub mod ws;

pub use client::GremlinClient;
pub use error::{GremlinError, GremlinResult};
pub use http::HttpClient;
pub use models::{Bindings, Credentials, Row, Script};
pub use traversal::{Order, Traversal, P};
pub use ws::WebSocketClient;
