//! The fixed demo dataset
//!
//! Five users, six products, and the friendships, purchases and
//! recommendations between them.

pub struct User {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub age: u32,
}

pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
}

pub struct Purchase {
    pub user: &'static str,
    pub product: &'static str,
    pub quantity: u32,
    pub rating: Option<u8>,
}

pub struct Recommendation {
    pub user: &'static str,
    pub product: &'static str,
    pub score: f64,
}

pub const USERS: &[User] = &[
    User { id: "user1", name: "Alice Johnson", email: "alice@email.com", age: 28 },
    User { id: "user2", name: "Bob Smith", email: "bob@email.com", age: 35 },
    User { id: "user3", name: "Carol Davis", email: "carol@email.com", age: 42 },
    User { id: "user4", name: "David Wilson", email: "david@email.com", age: 29 },
    User { id: "user5", name: "Eve Brown", email: "eve@email.com", age: 33 },
];

pub const PRODUCTS: &[Product] = &[
    Product { id: "prod1", name: "Laptop", category: "Electronics", price: 999.99 },
    Product { id: "prod2", name: "Coffee Maker", category: "Appliances", price: 79.99 },
    Product { id: "prod3", name: "Python Book", category: "Books", price: 29.99 },
    Product { id: "prod4", name: "Wireless Headphones", category: "Electronics", price: 149.99 },
    Product { id: "prod5", name: "Desk Chair", category: "Furniture", price: 199.99 },
    Product { id: "prod6", name: "Smartphone", category: "Electronics", price: 699.99 },
];

/// Stored as one `friends_with` edge each; traversed with `both()`
pub const FRIENDSHIPS: &[(&str, &str)] = &[
    ("user1", "user2"),
    ("user1", "user3"),
    ("user2", "user4"),
    ("user3", "user4"),
    ("user4", "user5"),
];

pub const PURCHASES: &[Purchase] = &[
    Purchase { user: "user1", product: "prod1", quantity: 1, rating: Some(5) },
    Purchase { user: "user1", product: "prod3", quantity: 2, rating: Some(4) },
    Purchase { user: "user2", product: "prod2", quantity: 1, rating: Some(5) },
    Purchase { user: "user2", product: "prod4", quantity: 1, rating: Some(4) },
    Purchase { user: "user3", product: "prod1", quantity: 1, rating: Some(5) },
    Purchase { user: "user3", product: "prod5", quantity: 1, rating: Some(3) },
    Purchase { user: "user4", product: "prod6", quantity: 1, rating: Some(5) },
    Purchase { user: "user4", product: "prod3", quantity: 1, rating: Some(4) },
    Purchase { user: "user5", product: "prod2", quantity: 1, rating: Some(4) },
    Purchase { user: "user5", product: "prod4", quantity: 1, rating: Some(5) },
];

pub const RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation { user: "user1", product: "prod4", score: 0.85 },
    Recommendation { user: "user2", product: "prod3", score: 0.72 },
    Recommendation { user: "user3", product: "prod6", score: 0.91 },
    Recommendation { user: "user4", product: "prod2", score: 0.68 },
    Recommendation { user: "user5", product: "prod1", score: 0.89 },
];

/// Vertices in a freshly seeded graph
pub fn vertex_count() -> usize {
    USERS.len() + PRODUCTS.len()
}

/// Edges in a freshly seeded graph
pub fn edge_count() -> usize {
    FRIENDSHIPS.len() + PURCHASES.len() + RECOMMENDATIONS.len()
}
