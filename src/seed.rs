//! Populate the graph with the demo dataset
//!
//! The graph is wiped first, then users, products, friendships, purchases
//! and recommendations are inserted in that order. There is no
//! transaction: a failure part way leaves whatever was already written.

use shopgraph_gremlin::{GremlinClient, GremlinResult};
use std::sync::Arc;
use tracing::info;

use crate::dataset::{FRIENDSHIPS, PRODUCTS, PURCHASES, RECOMMENDATIONS, USERS};
use crate::model::GraphModel;

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
    pub friendships: usize,
    pub purchases: usize,
    pub recommendations: usize,
}

impl SeedReport {
    pub fn vertices(&self) -> usize {
        self.users + self.products
    }

    pub fn edges(&self) -> usize {
        self.friendships + self.purchases + self.recommendations
    }
}

/// Wipe the graph and insert the fixed dataset
pub async fn populate(client: Arc<dyn GremlinClient>) -> GremlinResult<SeedReport> {
    let model = GraphModel::new(client);
    let mut report = SeedReport::default();

    println!("Clearing existing data...");
    model.clear().await?;

    println!("Creating sample users...");
    for user in USERS {
        model.create_user(user.id, user.name, user.email, user.age).await?;
        println!("Created user: {}", user.name);
        report.users += 1;
    }

    println!("\nCreating sample products...");
    for product in PRODUCTS {
        model
            .create_product(product.id, product.name, product.category, product.price)
            .await?;
        println!("Created product: {}", product.name);
        report.products += 1;
    }

    println!("\nCreating friendships...");
    for (a, b) in FRIENDSHIPS {
        model.create_friendship(a, b).await?;
        println!("Created friendship: {} <-> {}", a, b);
        report.friendships += 1;
    }

    println!("\nCreating purchases...");
    for purchase in PURCHASES {
        model
            .create_purchase(purchase.user, purchase.product, purchase.quantity, purchase.rating)
            .await?;
        println!("Created purchase: {} bought {}", purchase.user, purchase.product);
        report.purchases += 1;
    }

    println!("\nCreating recommendations...");
    for rec in RECOMMENDATIONS {
        model.create_recommendation(rec.user, rec.product, rec.score).await?;
        println!(
            "Created recommendation: {} -> {} (score: {})",
            rec.user, rec.product, rec.score
        );
        report.recommendations += 1;
    }

    info!(
        vertices = report.vertices(),
        edges = report.edges(),
        "Sample data populated"
    );
    println!("\nSample data populated successfully!");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;

    #[tokio::test]
    async fn test_populate_clears_then_inserts_in_order() {
        let mock = Arc::new(MockClient::new());
        let report = populate(mock.clone()).await.unwrap();

        assert_eq!(report.vertices(), 11);
        assert_eq!(report.edges(), 20);

        let scripts = mock.scripts();
        // 2 drops + 11 vertices + 20 edges
        assert_eq!(scripts.len(), 33);
        assert_eq!(scripts[0].text, "g.E().drop()");
        assert_eq!(scripts[1].text, "g.V().drop()");
        assert!(scripts[2..13].iter().all(|s| s.text.starts_with("g.addV(")));
        assert!(scripts[13..].iter().all(|s| s.text.contains(".addE(")));
    }

    #[tokio::test]
    async fn test_populate_twice_issues_same_writes() {
        let mock = Arc::new(MockClient::new());
        let first = populate(mock.clone()).await.unwrap();
        let second = populate(mock.clone()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.scripts().len(), 66);
    }

    #[tokio::test]
    async fn test_failure_stops_midway() {
        // Products fail, so nothing after the users is attempted
        let mock = Arc::new(MockClient::failing_on("Laptop"));
        assert!(populate(mock.clone()).await.is_err());
        assert_eq!(mock.scripts().len(), 2 + 5 + 1);
    }
}
