use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    if phone.chars().count() > 20 { return Err(errors::ModelError::Validation("phone too long (<=20)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, user_id: i32, phone: &str, address: &str) -> Result<Model, errors::ModelError> {
    validate_phone(phone)?;
    let am = ActiveModel {
        user_id: Set(user_id),
        phone: Set(phone.to_string()),
        address: Set(address.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

/// Update phone and/or address; a missing profile row is created.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if let Some(p) = phone { validate_phone(p)?; }
    match find_by_user(db, user_id).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            if let Some(p) = phone { am.phone = Set(p.to_string()); }
            if let Some(a) = address { am.address = Set(a.to_string()); }
            Ok(am.update(db).await?)
        }
        None => create(db, user_id, phone.unwrap_or_default(), address.unwrap_or_default()).await,
    }
}
