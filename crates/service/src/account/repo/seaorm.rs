use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};

use models::{profile, session, user, user_credentials};

use crate::account::domain::{Account, Credentials, NewAccount, Profile, ProfileChanges, Session, User};
use crate::account::errors::AccountError;
use crate::account::repository::AccountStore;

pub struct SeaOrmAccountStore {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_user(u: user::Model) -> User {
    User { id: u.id, username: u.username, email: u.email, first_name: u.first_name, last_name: u.last_name }
}

fn to_profile(p: Option<profile::Model>) -> Profile {
    p.map(|p| Profile { phone: p.phone, address: p.address }).unwrap_or_default()
}

fn to_session(s: session::Model) -> Session {
    Session {
        token: s.token,
        user_id: s.user_id,
        created_at: s.created_at.with_timezone(&Utc),
        expires_at: s.expires_at.with_timezone(&Utc),
    }
}

fn db_err(e: sea_orm::DbErr) -> AccountError { AccountError::Repository(e.to_string()) }

#[async_trait::async_trait]
impl AccountStore for SeaOrmAccountStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
        Ok(user::find_by_username(&self.db, username).await?.map(to_user))
    }

    async fn create_account(&self, input: NewAccount) -> Result<Account, AccountError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let created = user::create(
            &txn,
            user::NewUser {
                username: input.username,
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
            },
        )
        .await?;
        user_credentials::upsert_password(&txn, created.id, input.password_hash, &input.password_algorithm).await?;
        let profile = profile::create(&txn, created.id, &input.phone, &input.address).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(Account { user: to_user(created), profile: to_profile(Some(profile)) })
    }

    async fn get_account(&self, user_id: i32) -> Result<Option<Account>, AccountError> {
        let Some(found) = user::Entity::find_by_id(user_id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let profile = profile::find_by_user(&self.db, user_id).await?;
        Ok(Some(Account { user: to_user(found), profile: to_profile(profile) }))
    }

    async fn update_account(&self, user_id: i32, changes: &ProfileChanges) -> Result<Account, AccountError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let updated = user::update(
            &txn,
            user_id,
            user::UserChanges {
                username: changes.username.clone(),
                email: changes.email.clone(),
                first_name: changes.first_name.clone(),
                last_name: changes.last_name.clone(),
            },
        )
        .await?;
        let profile = if changes.phone.is_some() || changes.address.is_some() {
            Some(profile::update(&txn, user_id, changes.phone.as_deref(), changes.address.as_deref()).await?)
        } else {
            profile::find_by_user(&txn, user_id).await?
        };
        txn.commit().await.map_err(db_err)?;
        Ok(Account { user: to_user(updated), profile: to_profile(profile) })
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AccountError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn record_login(&self, user_id: i32, at: DateTime<Utc>) -> Result<(), AccountError> {
        user::record_login(&self.db, user_id, at.into()).await?;
        Ok(())
    }

    async fn create_session(&self, token: &str, user_id: i32, expires_at: DateTime<Utc>) -> Result<Session, AccountError> {
        Ok(to_session(session::create(&self.db, token, user_id, expires_at).await?))
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, AccountError> {
        Ok(session::find(&self.db, token).await?.map(to_session))
    }

    async fn delete_session(&self, token: &str) -> Result<bool, AccountError> {
        Ok(session::delete(&self.db, token).await?)
    }

    async fn delete_expired_sessions(&self, user_id: i32, now: DateTime<Utc>) -> Result<u64, AccountError> {
        Ok(session::delete_expired_for_user(&self.db, user_id, now).await?)
    }

    async fn sweep_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AccountError> {
        Ok(session::delete_all_expired(&self.db, now).await?)
    }
}
