use std::sync::Arc;

use tracing::{debug, instrument};

use super::domain::{Banner, Category, Product, ProductFilter, FEATURED_LIMIT};
use super::repository::CatalogStore;
use crate::errors::ServiceError;

/// Read-only catalog queries.
pub struct CatalogService<R: CatalogStore + ?Sized> {
    repo: Arc<R>,
}

impl<R: CatalogStore + ?Sized> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.repo.list_categories().await
    }

    /// Products filtered by exact category name and/or a case-insensitive search
    /// over name and description. Empty parameters are ignored.
    ///
    /// # Examples
    /// ```
    /// use service::catalog::{CatalogService, domain::ProductFilter, repository::mock::MockCatalogStore};
    /// use std::sync::Arc;
    /// let store = Arc::new(MockCatalogStore::with_sample_data().unwrap());
    /// let svc = CatalogService::new(store);
    /// let found = tokio_test::block_on(svc.list_products(ProductFilter::new(None, Some("CAFÉ")))).unwrap();
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].category_name, "Bebidas");
    /// ```
    #[instrument(skip(self, filter), fields(categoria = ?filter.category, search = ?filter.search))]
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, ServiceError> {
        let filter = filter.normalized();
        let products = self.repo.list_products(&filter).await?;
        debug!(count = products.len(), "products listed");
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.get_product(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    /// At most eight featured products, oldest first.
    #[instrument(skip(self))]
    pub async fn list_featured(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.list_featured(FEATURED_LIMIT).await
    }

    #[instrument(skip(self))]
    pub async fn list_active_banners(&self) -> Result<Vec<Banner>, ServiceError> {
        self.repo.list_active_banners().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::mock::MockCatalogStore;
    use models::banner::NewBanner;
    use models::product::NewProduct;
    use rust_decimal::Decimal;

    fn svc(store: MockCatalogStore) -> (Arc<MockCatalogStore>, CatalogService<MockCatalogStore>) {
        let store = Arc::new(store);
        (store.clone(), CatalogService::new(store))
    }

    fn product(name: &str, category_id: i32, featured: bool) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: None,
            price: Decimal::new(1000, 0),
            category_id,
            stock: 1,
            image: None,
            featured,
        }
    }

    #[tokio::test]
    async fn lists_everything_without_filters() {
        let (_, svc) = svc(MockCatalogStore::with_sample_data().unwrap());
        let all = svc.list_products(ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 5);
        let ids: Vec<i32> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(svc.list_categories().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let (_, svc) = svc(MockCatalogStore::with_sample_data().unwrap());
        let lacteos = svc.list_products(ProductFilter::new(Some("Lácteos"), None)).await.unwrap();
        assert_eq!(lacteos.len(), 1);
        assert_eq!(lacteos[0].name, "Queso Campesino 500g");
        let none = svc.list_products(ProductFilter::new(Some("Inexistente"), None)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn empty_params_behave_as_absent() {
        let (_, svc) = svc(MockCatalogStore::with_sample_data().unwrap());
        let all = svc.list_products(ProductFilter::new(Some(""), Some(""))).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let (_, svc) = svc(MockCatalogStore::with_sample_data().unwrap());
        assert_eq!(svc.get_product(3).await.unwrap().name, "Queso Campesino 500g");
        assert!(matches!(svc.get_product(999).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn featured_is_capped_and_ordered() {
        let (store, svc) = svc(MockCatalogStore::default());
        let cat = store.add_category("Varios").unwrap();
        for i in 0..10 {
            store.add_product(product(&format!("Destacado {i}"), cat.id, true)).unwrap();
        }
        store.add_product(product("Normal", cat.id, false)).unwrap();
        let featured = svc.list_featured().await.unwrap();
        assert_eq!(featured.len(), 8);
        assert_eq!(featured[0].name, "Destacado 0");
        assert!(featured.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn no_featured_products_yields_empty_list() {
        let (_, svc) = svc(MockCatalogStore::with_sample_data().unwrap());
        assert!(svc.list_featured().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_banners_are_hidden() {
        let (store, svc) = svc(MockCatalogStore::default());
        store.add_banner(NewBanner::new("Visible", "Promo", "banners/a.jpg")).unwrap();
        let mut hidden = NewBanner::new("Oculto", "Promo", "banners/b.jpg");
        hidden.active = false;
        store.add_banner(hidden).unwrap();
        let banners = svc.list_active_banners().await.unwrap();
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].title, "Visible");
        assert_eq!(banners[0].tag, "NUEVO");
    }
}
