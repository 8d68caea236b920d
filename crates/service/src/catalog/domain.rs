use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound of the featured listing.
pub const FEATURED_LIMIT: u64 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Product with its category name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i32,
    pub category_name: String,
    pub stock: i32,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub tag: String,
    pub image: String,
    pub background_style: String,
    pub text_style: String,
    pub button_label: String,
    pub link: String,
    pub active: bool,
}

/// Product listing filters, as received in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    /// Exact category name.
    #[serde(default, rename = "categoria")]
    pub category: Option<String>,
    /// Case-insensitive substring of name or description.
    #[serde(default)]
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        Self { category: category.map(str::to_string), search: search.map(str::to_string) }
    }

    /// Empty parameters mean "no filter".
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.filter(|c| !c.is_empty()),
            search: self.search.filter(|s| !s.is_empty()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category_name != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !(in_name || in_description) {
                return false;
            }
        }
        true
    }
}

impl From<models::category::Model> for Category {
    fn from(m: models::category::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}

impl Product {
    pub fn from_models(p: models::product::Model, category: Option<models::category::Model>) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            category_id: p.category_id,
            category_name: category.map(|c| c.name).unwrap_or_default(),
            stock: p.stock,
            image: p.image.filter(|i| !i.is_empty()),
            featured: p.featured,
        }
    }
}

impl From<models::banner::Model> for Banner {
    fn from(m: models::banner::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            subtitle: m.subtitle,
            tag: m.tag,
            image: m.image,
            background_style: m.background_style,
            text_style: m.text_style,
            button_label: m.button_label,
            link: m.link,
            active: m.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe() -> Product {
        Product {
            id: 2,
            name: "Café Colombiano 500g".into(),
            description: Some("Café premium de altura tostado medio".into()),
            price: Decimal::from(22000),
            category_id: 4,
            category_name: "Bebidas".into(),
            stock: 100,
            image: None,
            featured: false,
        }
    }

    #[test]
    fn empty_params_are_dropped() {
        let f = ProductFilter::new(Some(""), Some("")).normalized();
        assert_eq!(f, ProductFilter::default());
    }

    #[test]
    fn category_match_is_exact() {
        assert!(ProductFilter::new(Some("Bebidas"), None).matches(&cafe()));
        assert!(!ProductFilter::new(Some("bebidas"), None).matches(&cafe()));
        assert!(!ProductFilter::new(Some("Bebida"), None).matches(&cafe()));
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        assert!(ProductFilter::new(None, Some("café")).matches(&cafe()));
        assert!(ProductFilter::new(None, Some("CAFÉ COL")).matches(&cafe()));
        assert!(ProductFilter::new(None, Some("tostado")).matches(&cafe()));
        assert!(!ProductFilter::new(None, Some("queso")).matches(&cafe()));
    }

    #[test]
    fn filters_are_anded() {
        assert!(ProductFilter::new(Some("Bebidas"), Some("café")).matches(&cafe()));
        assert!(!ProductFilter::new(Some("Carnes"), Some("café")).matches(&cafe()));
    }
}
