use async_trait::async_trait;

use super::domain::{Banner, Category, Product, ProductFilter};
use crate::errors::ServiceError;

/// Repository abstraction for catalog reads.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories in insertion order.
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    /// Products matching `filter`, in insertion order. The filter is already normalized.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError>;
    async fn get_product(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    /// First `limit` featured products in insertion order.
    async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, ServiceError>;
    async fn list_active_banners(&self) -> Result<Vec<Banner>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    use models::banner::NewBanner;
    use models::product::NewProduct;

    #[derive(Default)]
    struct CatalogData {
        categories: Vec<Category>,
        products: Vec<Product>,
        banners: Vec<Banner>,
    }

    #[derive(Default)]
    pub struct MockCatalogStore {
        data: Mutex<CatalogData>,
    }

    impl MockCatalogStore {
        fn lock(&self) -> Result<MutexGuard<'_, CatalogData>, ServiceError> {
            self.data.lock().map_err(|_| ServiceError::Db("catalog mock poisoned".into()))
        }

        /// Catalog preloaded with the sample dataset.
        pub fn with_sample_data() -> Result<Self, ServiceError> {
            let store = Self::default();
            for name in crate::seed::SAMPLE_CATEGORIES {
                store.add_category(name)?;
            }
            for sample in crate::seed::sample_products() {
                let category_id = store
                    .category_id(sample.category)?
                    .ok_or_else(|| ServiceError::not_found("category"))?;
                store.add_product(sample.into_new_product(category_id))?;
            }
            Ok(store)
        }

        pub fn add_category(&self, name: &str) -> Result<Category, ServiceError> {
            models::category::validate_name(name)?;
            let mut data = self.lock()?;
            let category = Category { id: data.categories.len() as i32 + 1, name: name.to_string() };
            data.categories.push(category.clone());
            Ok(category)
        }

        pub fn category_id(&self, name: &str) -> Result<Option<i32>, ServiceError> {
            let data = self.lock()?;
            Ok(data.categories.iter().find(|c| c.name == name).map(|c| c.id))
        }

        pub fn add_product(&self, input: NewProduct) -> Result<Product, ServiceError> {
            models::product::validate_name(&input.name)?;
            models::product::validate_price(input.price)?;
            models::product::validate_stock(input.stock)?;
            let mut data = self.lock()?;
            let category_name = data
                .categories
                .iter()
                .find(|c| c.id == input.category_id)
                .map(|c| c.name.clone())
                .ok_or_else(|| ServiceError::Validation("category does not exist".into()))?;
            let product = Product {
                id: data.products.len() as i32 + 1,
                name: input.name,
                description: input.description,
                price: input.price.round_dp(2),
                category_id: input.category_id,
                category_name,
                stock: input.stock,
                image: input.image,
                featured: input.featured,
            };
            data.products.push(product.clone());
            Ok(product)
        }

        pub fn add_banner(&self, input: NewBanner) -> Result<Banner, ServiceError> {
            let mut data = self.lock()?;
            let banner = Banner {
                id: data.banners.len() as i32 + 1,
                title: input.title,
                subtitle: input.subtitle,
                tag: input.tag,
                image: input.image,
                background_style: input.background_style,
                text_style: input.text_style,
                button_label: input.button_label,
                link: input.link,
                active: input.active,
            };
            data.banners.push(banner.clone());
            Ok(banner)
        }
    }

    #[async_trait]
    impl CatalogStore for MockCatalogStore {
        async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
            Ok(self.lock()?.categories.clone())
        }

        async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError> {
            let data = self.lock()?;
            Ok(data.products.iter().filter(|p| filter.matches(p)).cloned().collect())
        }

        async fn get_product(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.lock()?.products.iter().find(|p| p.id == id).cloned())
        }

        async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, ServiceError> {
            let data = self.lock()?;
            Ok(data.products.iter().filter(|p| p.featured).take(limit as usize).cloned().collect())
        }

        async fn list_active_banners(&self) -> Result<Vec<Banner>, ServiceError> {
            Ok(self.lock()?.banners.iter().filter(|b| b.active).cloned().collect())
        }
    }
}
