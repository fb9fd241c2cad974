//! Query catalog
//!
//! The fixed set of read queries the demo runs. Two interchangeable
//! builders produce the scripts:
//!
//! - [`TraversalQueries`]: typed traversal builder
//! - [`ScriptQueries`]: hand-written Gremlin-Groovy
//!
//! Both issue the same logical query with the same parameter values;
//! [`Catalog`] executes whichever one it was given.

mod script;
mod traversal;

pub use script::ScriptQueries;
pub use traversal::TraversalQueries;

use serde::Serialize;
use serde_json::Value;
use shopgraph_gremlin::{GremlinClient, GremlinResult, Row, Script};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::model::first_u64;

pub const DEFAULT_POPULAR_LIMIT: i64 = 5;
pub const DEFAULT_MIN_RATING: i64 = 4;

/// Builds the script for each catalog query
pub trait QueryBuilder: Send + Sync {
    fn all_users(&self) -> Script;
    fn all_products(&self) -> Script;
    fn user_purchases(&self, user_id: &str) -> Script;
    fn user_friends(&self, user_id: &str) -> Script;
    fn recommendations_for_user(&self, user_id: &str) -> Script;
    /// Products bought by a user's friends, each listed once
    fn friends_purchases(&self, user_id: &str) -> Script;
    /// `{product, purchaseCount}` rows, most purchased first
    fn popular_products(&self, limit: i64) -> Script;
    fn products_by_category(&self, category: &str) -> Script;
    /// Products with at least one purchase rated `min_rating` or higher
    fn high_rated_products(&self, min_rating: i64) -> Script;
    fn direct_friend_count(&self, user_id: &str) -> Script;
    /// Friends of friends, excluding the user, each counted once
    fn extended_network_count(&self, user_id: &str) -> Script;
    fn total_purchases(&self) -> Script;
    fn average_rating(&self) -> Script;
    fn most_active_user(&self) -> Script;
}

/// Which builder a catalog uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStyle {
    #[default]
    Traversal,
    Script,
}

impl QueryStyle {
    pub fn builder(self) -> Box<dyn QueryBuilder> {
        match self {
            QueryStyle::Traversal => Box::new(TraversalQueries),
            QueryStyle::Script => Box::new(ScriptQueries),
        }
    }
}

impl fmt::Display for QueryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStyle::Traversal => write!(f, "traversal"),
            QueryStyle::Script => write!(f, "script"),
        }
    }
}

impl FromStr for QueryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "traversal" => Ok(QueryStyle::Traversal),
            "script" => Ok(QueryStyle::Script),
            other => Err(format!("unknown query style: {}", other)),
        }
    }
}

/// Friends and friends-of-friends of one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkSize {
    pub direct_friends: u64,
    pub extended_network: u64,
}

/// Aggregates over all purchases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseAnalytics {
    pub total_purchases: u64,
    /// None when no purchase carries a rating
    pub average_rating: Option<f64>,
    /// `{user, purchaseCount}`; None on an empty graph
    pub most_active_user: Option<Row>,
}

/// Executes catalog queries against one client
pub struct Catalog {
    client: Arc<dyn GremlinClient>,
    queries: Box<dyn QueryBuilder>,
}

impl Catalog {
    pub fn new(client: Arc<dyn GremlinClient>, style: QueryStyle) -> Self {
        Self {
            client,
            queries: style.builder(),
        }
    }

    pub fn queries(&self) -> &dyn QueryBuilder {
        self.queries.as_ref()
    }

    pub async fn all_users(&self) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.all_users()).await
    }

    pub async fn all_products(&self) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.all_products()).await
    }

    pub async fn user_purchases(&self, user_id: &str) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.user_purchases(user_id)).await
    }

    pub async fn user_friends(&self, user_id: &str) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.user_friends(user_id)).await
    }

    pub async fn recommendations_for_user(&self, user_id: &str) -> GremlinResult<Vec<Row>> {
        self.client
            .rows(&self.queries.recommendations_for_user(user_id))
            .await
    }

    pub async fn friends_purchases(&self, user_id: &str) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.friends_purchases(user_id)).await
    }

    pub async fn popular_products(&self, limit: i64) -> GremlinResult<Vec<Row>> {
        self.client.rows(&self.queries.popular_products(limit)).await
    }

    pub async fn products_by_category(&self, category: &str) -> GremlinResult<Vec<Row>> {
        self.client
            .rows(&self.queries.products_by_category(category))
            .await
    }

    pub async fn high_rated_products(&self, min_rating: i64) -> GremlinResult<Vec<Row>> {
        self.client
            .rows(&self.queries.high_rated_products(min_rating))
            .await
    }

    pub async fn user_network_size(&self, user_id: &str) -> GremlinResult<NetworkSize> {
        let direct = self
            .client
            .submit(&self.queries.direct_friend_count(user_id))
            .await?;
        let extended = self
            .client
            .submit(&self.queries.extended_network_count(user_id))
            .await?;
        Ok(NetworkSize {
            direct_friends: first_u64(&direct),
            extended_network: first_u64(&extended),
        })
    }

    pub async fn purchase_analytics(&self) -> GremlinResult<PurchaseAnalytics> {
        let total = self.client.submit(&self.queries.total_purchases()).await?;
        // mean() over nothing yields no value, or NaN which GraphSON sends as a string
        let average = self.client.submit(&self.queries.average_rating()).await?;
        let most_active = self.client.rows(&self.queries.most_active_user()).await?;

        Ok(PurchaseAnalytics {
            total_purchases: first_u64(&total),
            average_rating: average.first().and_then(Value::as_f64),
            most_active_user: most_active.into_iter().next(),
        })
    }
}
