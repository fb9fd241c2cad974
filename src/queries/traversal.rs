//! Catalog queries built with the typed traversal builder

use shopgraph_gremlin::traversal::{g, Traversal, __, Order, P};
use shopgraph_gremlin::Script;

use super::QueryBuilder;
use crate::model::{FRIENDS_WITH, PRODUCT, PURCHASED, RECOMMENDED, USER};

const PRODUCT_FIELDS: &[&str] = &["productId", "name", "category", "price"];

fn user(user_id: &str) -> Traversal {
    g().v().has_labeled(USER, "userId", user_id)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalQueries;

impl QueryBuilder for TraversalQueries {
    fn all_users(&self) -> Script {
        g().v().has_label(USER).value_map(&[]).build()
    }

    fn all_products(&self) -> Script {
        g().v().has_label(PRODUCT).value_map(&[]).build()
    }

    fn user_purchases(&self, user_id: &str) -> Script {
        user(user_id).out(PURCHASED).value_map(PRODUCT_FIELDS).build()
    }

    fn user_friends(&self, user_id: &str) -> Script {
        user(user_id)
            .both(FRIENDS_WITH)
            .value_map(&["userId", "name", "email"])
            .build()
    }

    fn recommendations_for_user(&self, user_id: &str) -> Script {
        user(user_id).out(RECOMMENDED).value_map(PRODUCT_FIELDS).build()
    }

    fn friends_purchases(&self, user_id: &str) -> Script {
        user(user_id)
            .both(FRIENDS_WITH)
            .out(PURCHASED)
            .dedup()
            .value_map(PRODUCT_FIELDS)
            .build()
    }

    fn popular_products(&self, limit: i64) -> Script {
        g().v()
            .has_label(PRODUCT)
            .project(&["product", "purchaseCount"])
            .by(__().value_map(&["productId", "name", "category"]))
            .by(__().in_(PURCHASED).count())
            .order()
            .by_order(__().select(&["purchaseCount"]), Order::Desc)
            .limit(limit)
            .build()
    }

    fn products_by_category(&self, category: &str) -> Script {
        g().v()
            .has_label(PRODUCT)
            .has("category", category)
            .value_map(&["productId", "name", "price"])
            .build()
    }

    fn high_rated_products(&self, min_rating: i64) -> Script {
        g().e()
            .has_label(PURCHASED)
            .has_pred("rating", P::gte(min_rating))
            .in_v()
            .dedup()
            .value_map(PRODUCT_FIELDS)
            .build()
    }

    fn direct_friend_count(&self, user_id: &str) -> Script {
        user(user_id).both(FRIENDS_WITH).count().build()
    }

    fn extended_network_count(&self, user_id: &str) -> Script {
        user(user_id)
            .both(FRIENDS_WITH)
            .both(FRIENDS_WITH)
            .where_(__().not(__().has("userId", user_id)))
            .dedup()
            .count()
            .build()
    }

    fn total_purchases(&self) -> Script {
        g().e().has_label(PURCHASED).count().build()
    }

    fn average_rating(&self) -> Script {
        g().e()
            .has_label(PURCHASED)
            .has_key("rating")
            .values(&["rating"])
            .mean()
            .build()
    }

    fn most_active_user(&self) -> Script {
        g().v()
            .has_label(USER)
            .project(&["user", "purchaseCount"])
            .by(__().values(&["name"]))
            .by(__().out(PURCHASED).count())
            .order()
            .by_order(__().select(&["purchaseCount"]), Order::Desc)
            .limit(1)
            .build()
    }
}
