//! Shop graph demo
//!
//! Seeds a small social / e-commerce graph (users, products, purchases,
//! friendships, recommendations) into a Gremlin-compatible database and
//! runs a fixed catalog of traversals against it.
//!
//! The database can be a local TinkerPop Gremlin Server or a managed
//! cluster, reached over HTTP or a WebSocket session. All traversal,
//! filtering and aggregation happen in the database; this crate builds
//! the scripts, sends them with their bindings, and prints the rows.
//!
//! ## Example Usage
//!
//! ```no_run
//! use shopgraph::{ConnectionConfig, Catalog, QueryStyle, Target, Transport};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ConnectionConfig::from_env()?;
//! let connection = config.connect(Target::Local, Transport::WebSocket).await?;
//!
//! shopgraph::seed::populate(connection.client()).await?;
//!
//! let catalog = Catalog::new(connection.client(), QueryStyle::Traversal);
//! let purchases = catalog.user_purchases("user1").await?;
//! assert_eq!(purchases.len(), 2);
//!
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod demo;
pub mod interactive;
pub mod model;
pub mod queries;
pub mod render;
pub mod seed;

#[cfg(test)]
mod mock;

pub use config::{ConfigError, Connection, ConnectionConfig, Target, Transport};
pub use demo::{run_demo, QueryRunner, RunOptions};
pub use interactive::{parse_command, run_shell, Command, Shell};
pub use model::GraphModel;
pub use queries::{Catalog, NetworkSize, PurchaseAnalytics, QueryBuilder, QueryStyle, ScriptQueries, TraversalQueries};
pub use render::OutputFormat;
pub use seed::{populate, SeedReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
