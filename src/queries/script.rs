//! Catalog queries written as raw Gremlin-Groovy
//!
//! Labels and property keys are fixed text; anything a caller supplies is
//! referenced by binding name and sent alongside the script.

use shopgraph_gremlin::Script;

use super::QueryBuilder;

const PRODUCT_FIELDS: &str = "'productId', 'name', 'category', 'price'";

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptQueries;

impl QueryBuilder for ScriptQueries {
    fn all_users(&self) -> Script {
        Script::new("g.V().hasLabel('user').valueMap()")
    }

    fn all_products(&self) -> Script {
        Script::new("g.V().hasLabel('product').valueMap()")
    }

    fn user_purchases(&self, user_id: &str) -> Script {
        Script::new(format!(
            "g.V().has('user', 'userId', uid).out('purchased').valueMap({})",
            PRODUCT_FIELDS
        ))
        .bind("uid", user_id)
    }

    fn user_friends(&self, user_id: &str) -> Script {
        Script::new("g.V().has('user', 'userId', uid).both('friends_with').valueMap('userId', 'name', 'email')")
            .bind("uid", user_id)
    }

    fn recommendations_for_user(&self, user_id: &str) -> Script {
        Script::new(format!(
            "g.V().has('user', 'userId', uid).out('recommended').valueMap({})",
            PRODUCT_FIELDS
        ))
        .bind("uid", user_id)
    }

    fn friends_purchases(&self, user_id: &str) -> Script {
        Script::new(format!(
            "g.V().has('user', 'userId', uid).both('friends_with').out('purchased').dedup().valueMap({})",
            PRODUCT_FIELDS
        ))
        .bind("uid", user_id)
    }

    fn popular_products(&self, limit: i64) -> Script {
        Script::new(
            "g.V().hasLabel('product')\
             .project('product', 'purchaseCount')\
             .by(__.valueMap('productId', 'name', 'category'))\
             .by(__.in('purchased').count())\
             .order().by(__.select('purchaseCount'), Order.desc)\
             .limit(maxRows)",
        )
        .bind("maxRows", limit)
    }

    fn products_by_category(&self, category: &str) -> Script {
        Script::new("g.V().hasLabel('product').has('category', categoryName).valueMap('productId', 'name', 'price')")
            .bind("categoryName", category)
    }

    fn high_rated_products(&self, min_rating: i64) -> Script {
        Script::new(format!(
            "g.E().hasLabel('purchased').has('rating', P.gte(minRating)).inV().dedup().valueMap({})",
            PRODUCT_FIELDS
        ))
        .bind("minRating", min_rating)
    }

    fn direct_friend_count(&self, user_id: &str) -> Script {
        Script::new("g.V().has('user', 'userId', uid).both('friends_with').count()").bind("uid", user_id)
    }

    fn extended_network_count(&self, user_id: &str) -> Script {
        Script::new(
            "g.V().has('user', 'userId', uid)\
             .both('friends_with').both('friends_with')\
             .where(__.not(__.has('userId', uid)))\
             .dedup().count()",
        )
        .bind("uid", user_id)
    }

    fn total_purchases(&self) -> Script {
        Script::new("g.E().hasLabel('purchased').count()")
    }

    fn average_rating(&self) -> Script {
        Script::new("g.E().hasLabel('purchased').has('rating').values('rating').mean()")
    }

    fn most_active_user(&self) -> Script {
        Script::new(
            "g.V().hasLabel('user')\
             .project('user', 'purchaseCount')\
             .by(__.values('name'))\
             .by(__.out('purchased').count())\
             .order().by(__.select('purchaseCount'), Order.desc)\
             .limit(1)",
        )
    }
}
