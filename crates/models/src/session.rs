use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub user_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
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

pub async fn create<C: ConnectionTrait>(
    db: &C,
    token: &str,
    user_id: i32,
    expires_at: DateTime<Utc>,
) -> Result<Model, errors::ModelError> {
    if token.is_empty() { return Err(errors::ModelError::Validation("session token required".into())); }
    let am = ActiveModel {
        token: Set(token.to_string()),
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
        expires_at: Set(expires_at.into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, token: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(token.to_string()).one(db).await?)
}

/// Returns whether a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, token: &str) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(token.to_string()).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete_expired_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    now: DateTime<Utc>,
) -> Result<u64, errors::ModelError> {
    let now: DateTimeWithTimeZone = now.into();
    let res = Entity::delete_many()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ExpiresAt.lte(now))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Remove every session that expired at or before `now`.
pub async fn delete_all_expired<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> Result<u64, errors::ModelError> {
    let now: DateTimeWithTimeZone = now.into();
    let res = Entity::delete_many().filter(Column::ExpiresAt.lte(now)).exec(db).await?;
    Ok(res.rows_affected)
}
