//! The scripted demo run
//!
//! Seeds the graph, runs every catalog query for one user and prints
//! what each returned. A failing query is reported and treated as empty;
//! the run carries on with the next one.

use shopgraph_gremlin::{GremlinResult, Row};
use tracing::{error, info};

use crate::config::{Connection, ConnectionConfig, Target, Transport};
use crate::queries::{Catalog, NetworkSize, PurchaseAnalytics, QueryStyle, DEFAULT_MIN_RATING};
use crate::render::{self, OutputFormat};
use crate::seed;

pub const DEMO_USER: &str = "user1";
pub const DEMO_CATEGORY: &str = "Electronics";
pub const DEMO_POPULAR_LIMIT: i64 = 3;

/// How a demo or shell session connects and prints
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub target: Target,
    pub transport: Transport,
    pub style: QueryStyle,
    pub format: OutputFormat,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            target: Target::Local,
            transport: Transport::WebSocket,
            style: QueryStyle::default(),
            format: OutputFormat::default(),
        }
    }
}

/// Runs catalog queries and prints their results
///
/// Errors never escape: they are logged, printed, and replaced with an
/// empty result.
pub struct QueryRunner {
    catalog: Catalog,
    format: OutputFormat,
}

impl QueryRunner {
    pub fn new(connection: &Connection, style: QueryStyle, format: OutputFormat) -> Self {
        Self {
            catalog: Catalog::new(connection.client(), style),
            format,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn show(&self, heading: &str, result: GremlinResult<Vec<Row>>) -> Vec<Row> {
        match result {
            Ok(rows) => {
                render::print_rows(heading, &rows, self.format);
                rows
            }
            Err(e) => {
                error!(query = heading, "Query failed: {}", e);
                println!("\n{}\nError: {}", heading, e);
                Vec::new()
            }
        }
    }

    pub async fn all_users(&self) -> Vec<Row> {
        self.show("=== All Users ===", self.catalog.all_users().await)
    }

    pub async fn all_products(&self) -> Vec<Row> {
        self.show("=== All Products ===", self.catalog.all_products().await)
    }

    pub async fn user_purchases(&self, user_id: &str) -> Vec<Row> {
        let heading = format!("=== Purchases by User {} ===", user_id);
        self.show(&heading, self.catalog.user_purchases(user_id).await)
    }

    pub async fn user_friends(&self, user_id: &str) -> Vec<Row> {
        let heading = format!("=== Friends of User {} ===", user_id);
        self.show(&heading, self.catalog.user_friends(user_id).await)
    }

    pub async fn recommendations_for_user(&self, user_id: &str) -> Vec<Row> {
        let heading = format!("=== Recommendations for User {} ===", user_id);
        self.show(&heading, self.catalog.recommendations_for_user(user_id).await)
    }

    pub async fn friends_purchases(&self, user_id: &str) -> Vec<Row> {
        let heading = format!("=== What Friends of User {} Bought ===", user_id);
        self.show(&heading, self.catalog.friends_purchases(user_id).await)
    }

    pub async fn popular_products(&self, limit: i64) -> Vec<Row> {
        let heading = format!("=== Top {} Popular Products ===", limit);
        self.show(&heading, self.catalog.popular_products(limit).await)
    }

    pub async fn products_by_category(&self, category: &str) -> Vec<Row> {
        let heading = format!("=== Products in {} Category ===", category);
        self.show(&heading, self.catalog.products_by_category(category).await)
    }

    pub async fn high_rated_products(&self, min_rating: i64) -> Vec<Row> {
        let heading = format!("=== Products with Rating >= {} ===", min_rating);
        self.show(&heading, self.catalog.high_rated_products(min_rating).await)
    }

    pub async fn user_network_size(&self, user_id: &str) -> Option<NetworkSize> {
        println!("\n=== Network Size for User {} ===", user_id);
        match self.catalog.user_network_size(user_id).await {
            Ok(size) => {
                match self.format {
                    OutputFormat::Json => println!("{}", render::to_json(&size)),
                    OutputFormat::Table => {
                        println!("Direct friends: {}", size.direct_friends);
                        println!("Extended network: {}", size.extended_network);
                    }
                }
                Some(size)
            }
            Err(e) => {
                error!(user_id, "Network size query failed: {}", e);
                println!("Error: {}", e);
                None
            }
        }
    }

    pub async fn purchase_analytics(&self) -> Option<PurchaseAnalytics> {
        println!("\n=== Purchase Analytics ===");
        match self.catalog.purchase_analytics().await {
            Ok(analytics) => {
                match self.format {
                    OutputFormat::Json => println!("{}", render::to_json(&analytics)),
                    OutputFormat::Table => print_analytics(&analytics),
                }
                Some(analytics)
            }
            Err(e) => {
                error!("Analytics query failed: {}", e);
                println!("Error: {}", e);
                None
            }
        }
    }

    /// Every catalog query, in demo order
    pub async fn run_all(&self) {
        self.all_users().await;
        self.all_products().await;
        self.user_purchases(DEMO_USER).await;
        self.user_friends(DEMO_USER).await;
        self.recommendations_for_user(DEMO_USER).await;
        self.friends_purchases(DEMO_USER).await;
        self.popular_products(DEMO_POPULAR_LIMIT).await;
        self.products_by_category(DEMO_CATEGORY).await;
        self.high_rated_products(DEFAULT_MIN_RATING).await;
        self.user_network_size(DEMO_USER).await;
        self.purchase_analytics().await;
    }
}

fn print_analytics(analytics: &PurchaseAnalytics) {
    println!("Total purchases: {}", analytics.total_purchases);
    match analytics.average_rating {
        Some(avg) => println!("Average rating: {:.2}", avg),
        None => println!("Average rating: n/a"),
    }
    match &analytics.most_active_user {
        Some(user) => {
            let name = user.get("user").and_then(|v| v.as_str()).unwrap_or("?");
            let count = user.get("purchaseCount").and_then(|v| v.as_u64()).unwrap_or(0);
            println!("Most active user: {} ({} purchases)", name, count);
        }
        None => println!("Most active user: none"),
    }
}

fn print_concepts() {
    println!("\nKey Gremlin Concepts Demonstrated:");
    println!("- Vertex creation and properties: addV(), property()");
    println!("- Edge creation: addE().from().to()");
    println!("- Graph traversal: V(), out(), in(), both()");
    println!("- Filtering: has(), where()");
    println!("- Aggregation: count(), mean(), dedup()");
    println!("- Projection: project(), by()");
    println!("- Ordering: order(), limit()");
    println!("- Complex patterns: friends-of-friends, collaborative filtering");
}

/// Seed an open connection, then run and print every query
pub async fn run_demo_on(connection: &Connection, options: &RunOptions) -> anyhow::Result<()> {
    println!("\nSetting up sample data...");
    if let Err(e) = seed::populate(connection.client()).await {
        println!("Failed to populate data: {}", e);
        println!("Make sure a Gremlin server is running locally or the managed endpoint is configured.");
        return Err(e.into());
    }

    println!("\nRunning demonstration queries...");
    println!("{}", "=".repeat(50));

    let runner = QueryRunner::new(connection, options.style, options.format);
    runner.run_all().await;

    println!("\nDemo completed.");
    print_concepts();
    Ok(())
}

/// Connect, run the demo, and close the connection whatever happened
pub async fn run_demo(config: &ConnectionConfig, options: &RunOptions) -> anyhow::Result<()> {
    println!("Gremlin Graph Database Demo");
    println!("{}", "=".repeat(50));
    info!(
        mode = %options.target,
        transport = %options.transport,
        style = %options.style,
        "Starting demo"
    );

    let connection = match config.connect(options.target, options.transport).await {
        Ok(connection) => connection,
        Err(e) => {
            println!("Failed to connect to the Gremlin server: {}", e);
            return Err(e);
        }
    };

    let result = run_demo_on(&connection, options).await;
    if let Err(e) = connection.close().await {
        error!("Failed to close connection: {}", e);
    }
    result
}
