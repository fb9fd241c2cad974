//! Vertex and edge creation for the shop graph
//!
//! Every write goes through the traversal builder, so ids, names and
//! ratings are bindings rather than script text.

use chrono::Utc;
use serde_json::Value;
use shopgraph_gremlin::traversal::{g, Traversal};
use shopgraph_gremlin::{GremlinClient, GremlinResult};
use std::sync::Arc;

pub const USER: &str = "user";
pub const PRODUCT: &str = "product";
pub const PURCHASED: &str = "purchased";
pub const FRIENDS_WITH: &str = "friends_with";
pub const RECOMMENDED: &str = "recommended";

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Look up a user, then a product, and label both for `addE().from().to()`
fn user_to_product(user_id: &str, product_id: &str) -> Traversal {
    g().v()
        .has_labeled(USER, "userId", user_id)
        .as_("u")
        .v()
        .has_labeled(PRODUCT, "productId", product_id)
        .as_("p")
}

pub fn user_vertex(user_id: &str, name: &str, email: &str, age: u32, created_at: &str) -> Traversal {
    g().add_v(USER)
        .property("userId", user_id)
        .property("name", name)
        .property("email", email)
        .property("age", age)
        .property("createdAt", created_at)
}

pub fn product_vertex(product_id: &str, name: &str, category: &str, price: f64, created_at: &str) -> Traversal {
    g().add_v(PRODUCT)
        .property("productId", product_id)
        .property("name", name)
        .property("category", category)
        .property("price", price)
        .property("createdAt", created_at)
}

pub fn purchase_edge(
    user_id: &str,
    product_id: &str,
    quantity: u32,
    rating: Option<u8>,
    purchased_at: &str,
) -> Traversal {
    let edge = user_to_product(user_id, product_id)
        .add_e(PURCHASED)
        .from_("u")
        .to("p")
        .property("quantity", quantity)
        .property("purchaseDate", purchased_at);
    match rating {
        Some(rating) => edge.property("rating", rating),
        None => edge,
    }
}

pub fn friendship_edge(user_id1: &str, user_id2: &str, created_at: &str) -> Traversal {
    g().v()
        .has_labeled(USER, "userId", user_id1)
        .as_("u1")
        .v()
        .has_labeled(USER, "userId", user_id2)
        .as_("u2")
        .add_e(FRIENDS_WITH)
        .from_("u1")
        .to("u2")
        .property("createdAt", created_at)
}

pub fn recommendation_edge(user_id: &str, product_id: &str, score: f64, created_at: &str) -> Traversal {
    user_to_product(user_id, product_id)
        .add_e(RECOMMENDED)
        .from_("u")
        .to("p")
        .property("score", score)
        .property("createdAt", created_at)
}

/// Writes vertices and edges of the shop graph
pub struct GraphModel {
    client: Arc<dyn GremlinClient>,
}

impl GraphModel {
    pub fn new(client: Arc<dyn GremlinClient>) -> Self {
        Self { client }
    }

    /// Drop every edge, then every vertex
    pub async fn clear(&self) -> GremlinResult<()> {
        self.client.traverse(&g().e().drop()).await?;
        self.client.traverse(&g().v().drop()).await?;
        Ok(())
    }

    pub async fn create_user(&self, user_id: &str, name: &str, email: &str, age: u32) -> GremlinResult<Vec<Value>> {
        self.client
            .traverse(&user_vertex(user_id, name, email, age, &now()))
            .await
    }

    pub async fn create_product(
        &self,
        product_id: &str,
        name: &str,
        category: &str,
        price: f64,
    ) -> GremlinResult<Vec<Value>> {
        self.client
            .traverse(&product_vertex(product_id, name, category, price, &now()))
            .await
    }

    /// A purchase without a rating simply has no `rating` property
    pub async fn create_purchase(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
        rating: Option<u8>,
    ) -> GremlinResult<Vec<Value>> {
        self.client
            .traverse(&purchase_edge(user_id, product_id, quantity, rating, &now()))
            .await
    }

    pub async fn create_friendship(&self, user_id1: &str, user_id2: &str) -> GremlinResult<Vec<Value>> {
        self.client
            .traverse(&friendship_edge(user_id1, user_id2, &now()))
            .await
    }

    pub async fn create_recommendation(
        &self,
        user_id: &str,
        product_id: &str,
        score: f64,
    ) -> GremlinResult<Vec<Value>> {
        self.client
            .traverse(&recommendation_edge(user_id, product_id, score, &now()))
            .await
    }

    /// `(vertices, edges)` currently in the graph
    pub async fn graph_counts(&self) -> GremlinResult<(u64, u64)> {
        let vertices = self.client.traverse(&g().v().count()).await?;
        let edges = self.client.traverse(&g().e().count()).await?;
        Ok((first_u64(&vertices), first_u64(&edges)))
    }
}

/// The single number a `count()` returns; 0 when the result is empty
pub(crate) fn first_u64(values: &[Value]) -> u64 {
    values.first().and_then(Value::as_u64).unwrap_or(0)
}
