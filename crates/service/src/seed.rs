//! Sample catalog used by the `seed` binary and by the mock stores.

use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use tracing::info;

use models::banner::NewBanner;
use models::product::NewProduct;
use crate::errors::ServiceError;

pub const SAMPLE_CATEGORIES: [&str; 5] = ["Carnes", "Lácteos", "Panadería", "Bebidas", "Dulces"];

#[derive(Debug, Clone)]
pub struct SampleProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub price: i64,
    pub category: &'static str,
    pub stock: i32,
}

impl SampleProduct {
    pub fn into_new_product(self, category_id: i32) -> NewProduct {
        NewProduct {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            price: Decimal::new(self.price, 0),
            category_id,
            stock: self.stock,
            image: None,
            featured: false,
        }
    }
}

pub fn sample_products() -> Vec<SampleProduct> {
    vec![
        SampleProduct {
            name: "Chicharrón Premium 500g",
            description: "Chicharrón de cerdo crocante y dorado perfectamente",
            price: 18000,
            category: "Carnes",
            stock: 50,
        },
        SampleProduct {
            name: "Café Colombiano 500g",
            description: "Café premium de altura tostado medio",
            price: 22000,
            category: "Bebidas",
            stock: 100,
        },
        SampleProduct {
            name: "Queso Campesino 500g",
            description: "Queso fresco campesino tradicional",
            price: 14000,
            category: "Lácteos",
            stock: 75,
        },
        SampleProduct {
            name: "Arepas de Maíz x6",
            description: "Arepas tradicionales listas para asar",
            price: 12500,
            category: "Panadería",
            stock: 200,
        },
        SampleProduct {
            name: "Arequipe Colombiano 400g",
            description: "Dulce de leche cremoso tradicional",
            price: 8200,
            category: "Dulces",
            stock: 120,
        },
    ]
}

/// Storefront hero banner; styling columns keep their defaults.
pub fn sample_banner() -> NewBanner {
    NewBanner::new(
        "Sabores de Colombia",
        "Productos típicos directo a tu mesa",
        "banners/sabores-de-colombia.jpg",
    )
}

/// Rows created by one [`load_sample_data`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub products_created: usize,
    pub banners_created: usize,
}

/// Insert the sample catalog, skipping rows that already exist by name.
pub async fn load_sample_data<C: ConnectionTrait>(db: &C) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();
    for name in SAMPLE_CATEGORIES {
        let (_, created) = models::category::get_or_create(db, name).await?;
        if created {
            info!(category = name, "category created");
            report.categories_created += 1;
        }
    }
    for sample in sample_products() {
        let category = models::category::find_by_name(db, sample.category)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        let name = sample.name;
        let (_, created) = models::product::get_or_create(db, sample.into_new_product(category.id)).await?;
        if created {
            info!(product = name, "product created");
            report.products_created += 1;
        }
    }
    let (banner, created) = models::banner::get_or_create(db, sample_banner()).await?;
    if created {
        info!(banner = %banner.title, "banner created");
        report.banners_created += 1;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};

    #[test]
    fn every_sample_product_has_a_known_category() {
        for p in sample_products() {
            assert!(SAMPLE_CATEGORIES.contains(&p.category), "{}", p.name);
        }
    }

    #[tokio::test]
    async fn loading_twice_creates_nothing_new() {
        let Some(db) = crate::test_support::get_db().await.unwrap() else { return };
        let txn = db.begin().await.unwrap();
        load_sample_data(&txn).await.unwrap();
        let second = load_sample_data(&txn).await.unwrap();
        assert_eq!(second, SeedReport::default());
        let carnes = models::category::find_by_name(&txn, "Carnes").await.unwrap();
        assert!(carnes.is_some());
        let banner = models::banner::Entity::find()
            .filter(models::banner::Column::Title.eq(sample_banner().title))
            .one(&txn)
            .await
            .unwrap()
            .expect("sample banner");
        assert!(banner.active);
        txn.rollback().await.unwrap();
    }
}
