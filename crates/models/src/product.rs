use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::category;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub category_id: i32,
    pub stock: i32,
    pub image: Option<String>,
    pub featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Category,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity)
                .from(Column::CategoryId)
                .to(category::Column::Id)
                .into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields for inserting a product.
#[derive(Clone, Debug)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: i32,
    pub stock: i32,
    pub image: Option<String>,
    pub featured: bool,
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("product name required".into())); }
    if name.chars().count() > 200 { return Err(errors::ModelError::Validation("product name too long (<=200)".into())); }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), errors::ModelError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(errors::ModelError::Validation("price must be >= 0".into()));
    }
    // decimal(10, 2): at most 8 integer digits
    if price.trunc().abs() >= Decimal::from(100_000_000i64) {
        return Err(errors::ModelError::Validation("price exceeds 10 digits".into()));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), errors::ModelError> {
    if stock < 0 { return Err(errors::ModelError::Validation("stock must be >= 0".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewProduct) -> Result<Model, errors::ModelError> {
    validate_name(&input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;
    if category::Entity::find_by_id(input.category_id).one(db).await?.is_none() {
        return Err(errors::ModelError::Validation("category does not exist".into()));
    }
    let am = ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price.round_dp(2)),
        category_id: Set(input.category_id),
        stock: Set(input.stock),
        image: Set(input.image),
        featured: Set(input.featured),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Name.eq(name)).one(db).await?)
}

/// Looks a product up by name and inserts `input` only when it is missing.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, input: NewProduct) -> Result<(Model, bool), errors::ModelError> {
    if let Some(existing) = find_by_name(db, &input.name).await? {
        return Ok((existing, false));
    }
    Ok((create(db, input).await?, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(1800000, 2)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
        assert!(validate_price(Decimal::from(100_000_000i64)).is_err());
    }

    #[test]
    fn stock_and_name_rules() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
        assert!(validate_name("Queso Campesino 500g").is_ok());
    }
}
