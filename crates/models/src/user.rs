use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::{profile, session, user_credentials};

pub const USERNAME_MAX_LEN: usize = 150;
pub const NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTimeWithTimeZone,
    pub last_login: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Credentials,
    Profile,
    Session,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Credentials => Entity::has_one(user_credentials::Entity).into(),
            Relation::Profile => Entity::has_one(profile::Entity).into(),
            Relation::Session => Entity::has_many(session::Entity).into(),
        }
    }
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::Profile.def() }
}

impl Related<user_credentials::Entity> for Entity {
    fn to() -> RelationDef { Relation::Credentials.def() }
}

impl Related<session::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Usernames: 1..=150 characters drawn from letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.is_empty() { return Err(errors::ModelError::Validation("username required".into())); }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(errors::ModelError::Validation("username too long (<=150)".into()));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')) {
        return Err(errors::ModelError::Validation("username may only contain letters, digits and @/./+/-/_".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let email = email.trim();
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(errors::ModelError::Validation("email too long (<=254)".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(errors::ModelError::Validation("invalid email".into())),
    }
}

/// First and last names share the column width.
pub fn validate_name_part(value: &str) -> Result<(), errors::ModelError> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation("name too long (<=150)".into()));
    }
    Ok(())
}

/// Fields for inserting a user row.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewUser) -> Result<Model, errors::ModelError> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_name_part(&input.first_name)?;
    validate_name_part(&input.last_name)?;
    let am = ActiveModel {
        username: Set(input.username),
        email: Set(input.email.trim().to_string()),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        date_joined: Set(Utc::now().into()),
        last_login: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

/// Optional column updates for an existing user.
#[derive(Clone, Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}

pub async fn update<C: ConnectionTrait>(db: &C, id: i32, changes: UserChanges) -> Result<Model, errors::ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("user not found".into()))?;
    if changes.is_empty() {
        return Ok(found);
    }
    let mut am: ActiveModel = found.into();
    if let Some(username) = changes.username {
        validate_username(&username)?;
        am.username = Set(username);
    }
    if let Some(email) = changes.email {
        validate_email(&email)?;
        am.email = Set(email.trim().to_string());
    }
    if let Some(first_name) = changes.first_name {
        validate_name_part(&first_name)?;
        am.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        validate_name_part(&last_name)?;
        am.last_name = Set(last_name);
    }
    Ok(am.update(db).await?)
}

pub async fn record_login<C: ConnectionTrait>(db: &C, id: i32, at: DateTimeWithTimeZone) -> Result<(), errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("user not found".into()))?
        .into();
    found.last_login = Set(Some(at));
    found.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("maria.gomez+1@correo.co").is_ok());
        assert!(validate_username("josé_01").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("con espacio").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("cliente@tienda.co").is_ok());
        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("@tienda.co").is_err());
        assert!(validate_email("a@b@c").is_err());
        let long_local = format!("{}@tienda.co", "a".repeat(250));
        assert!(validate_email(&long_local).is_err());
    }

    #[test]
    fn name_parts_fit_the_column() {
        assert!(validate_name_part("").is_ok());
        assert!(validate_name_part(&"ñ".repeat(150)).is_ok());
        assert!(validate_name_part(&"a".repeat(151)).is_err());
    }
}
