use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use models::{banner, category, product};

use crate::catalog::domain::{Banner, Category, Product, ProductFilter};
use crate::catalog::repository::CatalogStore;
use crate::errors::ServiceError;

pub struct SeaOrmCatalogStore {
    pub db: DatabaseConnection,
}

impl SeaOrmCatalogStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn search_condition(needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    let lower_like = |col: product::Column| {
        Expr::expr(Func::lower(Expr::col((product::Entity, col))))
            .like(LikeExpr::new(pattern.clone()).escape('\\'))
    };
    Condition::any()
        .add(lower_like(product::Column::Name))
        .add(lower_like(product::Column::Description))
}

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

#[async_trait::async_trait]
impl CatalogStore for SeaOrmCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let rows = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError> {
        let mut query = product::Entity::find().find_also_related(category::Entity);
        if let Some(name) = &filter.category {
            query = query.filter(category::Column::Name.eq(name.as_str()));
        }
        if let Some(search) = &filter.search {
            query = query.filter(search_condition(search));
        }
        let rows = query
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|(p, c)| Product::from_models(p, c)).collect())
    }

    async fn get_product(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        let row = product::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(|(p, c)| Product::from_models(p, c)))
    }

    async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, ServiceError> {
        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .filter(product::Column::Featured.eq(true))
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|(p, c)| Product::from_models(p, c)).collect())
    }

    async fn list_active_banners(&self) -> Result<Vec<Banner>, ServiceError> {
        let rows = banner::Entity::find()
            .filter(banner::Column::Active.eq(true))
            .order_by_asc(banner::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Banner::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::product::NewProduct;
    use rust_decimal::Decimal;

    /// Committed rows: the store works on a pool, not a transaction.
    struct Fixture {
        store: SeaOrmCatalogStore,
        tag: String,
        category: category::Model,
    }

    impl Fixture {
        async fn new() -> Option<Self> {
            let db = crate::test_support::get_db().await.unwrap()?;
            let tag = uuid::Uuid::new_v4().simple().to_string()[..12].to_string();
            let category = category::create(&db, &format!("Carnes-{tag}")).await.unwrap();
            Some(Self { store: SeaOrmCatalogStore::new(db), tag, category })
        }

        async fn product(&self, name: &str, featured: bool) -> product::Model {
            product::create(&self.store.db, NewProduct {
                name: format!("{} {name}", self.tag),
                description: None,
                price: Decimal::new(1000, 0),
                category_id: self.category.id,
                stock: 1,
                image: None,
                featured,
            })
            .await
            .unwrap()
        }

        async fn cleanup(self) {
            category::Entity::delete_by_id(self.category.id).exec(&self.store.db).await.unwrap();
        }
    }

    fn names(products: &[Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[tokio::test]
    async fn featured_is_flag_filtered_and_capped() {
        let Some(fx) = Fixture::new().await else { return };
        for i in 0..10 {
            fx.product(&format!("destacado {i}"), true).await;
        }
        let plain = fx.product("normal", false).await;
        let featured = fx.store.list_featured(8).await.unwrap();
        assert_eq!(featured.len(), 8);
        assert!(featured.iter().all(|p| p.featured));
        assert!(featured.iter().all(|p| p.id != plain.id));
        fx.cleanup().await;
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let Some(fx) = Fixture::new().await else { return };
        fx.product("100% natural", false).await;
        fx.product("1000 natural", false).await;
        fx.product("a_b", false).await;
        fx.product("axb", false).await;
        let tag = &fx.tag;

        let found = fx.store.list_products(&ProductFilter::new(None, Some(&format!("{tag} 100%")))).await.unwrap();
        assert_eq!(names(&found), vec![format!("{tag} 100% natural")]);
        let found = fx.store.list_products(&ProductFilter::new(None, Some(&format!("{tag} a_b")))).await.unwrap();
        assert_eq!(names(&found), vec![format!("{tag} a_b")]);
        let found = fx.store.list_products(&ProductFilter::new(None, Some(&tag.to_uppercase()))).await.unwrap();
        assert_eq!(found.len(), 4);
        fx.cleanup().await;
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let Some(fx) = Fixture::new().await else { return };
        let p = fx.product("chicharrón", false).await;
        let exact = fx.store.list_products(&ProductFilter::new(Some(&fx.category.name), None)).await.unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].id, p.id);
        assert_eq!(exact[0].category_name, fx.category.name);
        let lower = fx.category.name.to_lowercase();
        let none = fx.store.list_products(&ProductFilter::new(Some(&lower), None)).await.unwrap();
        assert!(none.is_empty());
        assert_eq!(fx.store.get_product(p.id).await.unwrap().map(|f| f.id), Some(p.id));
        fx.cleanup().await;
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\x"), "c:\\\\x");
        assert_eq!(escape_like("café"), "café");
    }
}
