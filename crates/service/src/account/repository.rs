use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{Account, Credentials, NewAccount, ProfileChanges, Session, User};
use super::errors::AccountError;

/// Repository abstraction for users, credentials, profiles and sessions
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError>;
    /// Insert user, credentials and profile atomically. A taken username is `Conflict`.
    async fn create_account(&self, input: NewAccount) -> Result<Account, AccountError>;
    async fn get_account(&self, user_id: i32) -> Result<Option<Account>, AccountError>;
    async fn update_account(&self, user_id: i32, changes: &ProfileChanges) -> Result<Account, AccountError>;
    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AccountError>;
    async fn record_login(&self, user_id: i32, at: DateTime<Utc>) -> Result<(), AccountError>;
    async fn create_session(&self, token: &str, user_id: i32, expires_at: DateTime<Utc>) -> Result<Session, AccountError>;
    async fn find_session(&self, token: &str) -> Result<Option<Session>, AccountError>;
    /// Returns whether a session was removed.
    async fn delete_session(&self, token: &str) -> Result<bool, AccountError>;
    /// Remove the user's sessions that expired at or before `now`.
    async fn delete_expired_sessions(&self, user_id: i32, now: DateTime<Utc>) -> Result<u64, AccountError>;
    /// Remove every session that expired at or before `now`, whoever owns it.
    async fn sweep_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AccountError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Mutex, MutexGuard};

    use crate::account::domain::Profile;

    #[derive(Default)]
    struct AccountData {
        next_id: i32,
        users: BTreeMap<i32, User>,
        credentials: HashMap<i32, Credentials>,
        profiles: HashMap<i32, Profile>,
        last_login: HashMap<i32, DateTime<Utc>>,
        sessions: HashMap<String, Session>,
    }

    #[derive(Default)]
    pub struct MockAccountStore {
        data: Mutex<AccountData>,
    }

    impl MockAccountStore {
        fn lock(&self) -> Result<MutexGuard<'_, AccountData>, AccountError> {
            self.data.lock().map_err(|_| AccountError::Repository("account mock poisoned".into()))
        }

        pub fn user_count(&self) -> usize { self.lock().map(|d| d.users.len()).unwrap_or_default() }
        pub fn profile_count(&self) -> usize { self.lock().map(|d| d.profiles.len()).unwrap_or_default() }
        pub fn session_count(&self) -> usize { self.lock().map(|d| d.sessions.len()).unwrap_or_default() }

        pub fn last_login(&self, user_id: i32) -> Option<DateTime<Utc>> {
            self.lock().ok().and_then(|d| d.last_login.get(&user_id).copied())
        }

        /// Move a session's expiry, e.g. into the past.
        pub fn set_session_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> bool {
            match self.lock() {
                Ok(mut d) => match d.sessions.get_mut(token) {
                    Some(s) => {
                        s.expires_at = expires_at;
                        true
                    }
                    None => false,
                },
                Err(_) => false,
            }
        }

        fn account(data: &AccountData, user_id: i32) -> Option<Account> {
            let user = data.users.get(&user_id)?.clone();
            let profile = data.profiles.get(&user_id).cloned().unwrap_or_default();
            Some(Account { user, profile })
        }
    }

    #[async_trait]
    impl AccountStore for MockAccountStore {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AccountError> {
            let data = self.lock()?;
            Ok(data.users.values().find(|u| u.username == username).cloned())
        }

        async fn create_account(&self, input: NewAccount) -> Result<Account, AccountError> {
            models::user::validate_username(&input.username)?;
            models::user::validate_email(&input.email)?;
            models::profile::validate_phone(&input.phone)?;
            let mut data = self.lock()?;
            if data.users.values().any(|u| u.username == input.username) {
                return Err(AccountError::Conflict);
            }
            data.next_id += 1;
            let id = data.next_id;
            let user = User {
                id,
                username: input.username,
                email: input.email.trim().to_string(),
                first_name: input.first_name,
                last_name: input.last_name,
            };
            let profile = Profile { phone: input.phone, address: input.address };
            data.users.insert(id, user.clone());
            data.credentials.insert(
                id,
                Credentials { user_id: id, password_hash: input.password_hash, password_algorithm: input.password_algorithm },
            );
            data.profiles.insert(id, profile.clone());
            Ok(Account { user, profile })
        }

        async fn get_account(&self, user_id: i32) -> Result<Option<Account>, AccountError> {
            let data = self.lock()?;
            Ok(Self::account(&data, user_id))
        }

        async fn update_account(&self, user_id: i32, changes: &ProfileChanges) -> Result<Account, AccountError> {
            let mut data = self.lock()?;
            if let Some(username) = &changes.username {
                if data.users.values().any(|u| u.id != user_id && &u.username == username) {
                    return Err(AccountError::Conflict);
                }
            }
            let user = data.users.get_mut(&user_id).ok_or(AccountError::Unauthorized)?;
            if let Some(v) = &changes.username { user.username = v.clone(); }
            if let Some(v) = &changes.email { user.email = v.trim().to_string(); }
            if let Some(v) = &changes.first_name { user.first_name = v.clone(); }
            if let Some(v) = &changes.last_name { user.last_name = v.clone(); }
            let profile = data.profiles.entry(user_id).or_default();
            if let Some(v) = &changes.phone { profile.phone = v.clone(); }
            if let Some(v) = &changes.address { profile.address = v.clone(); }
            Self::account(&data, user_id).ok_or(AccountError::Unauthorized)
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AccountError> {
            Ok(self.lock()?.credentials.get(&user_id).cloned())
        }

        async fn record_login(&self, user_id: i32, at: DateTime<Utc>) -> Result<(), AccountError> {
            self.lock()?.last_login.insert(user_id, at);
            Ok(())
        }

        async fn create_session(&self, token: &str, user_id: i32, expires_at: DateTime<Utc>) -> Result<Session, AccountError> {
            let session = Session { token: token.to_string(), user_id, created_at: Utc::now(), expires_at };
            self.lock()?.sessions.insert(token.to_string(), session.clone());
            Ok(session)
        }

        async fn find_session(&self, token: &str) -> Result<Option<Session>, AccountError> {
            Ok(self.lock()?.sessions.get(token).cloned())
        }

        async fn delete_session(&self, token: &str) -> Result<bool, AccountError> {
            Ok(self.lock()?.sessions.remove(token).is_some())
        }

        async fn delete_expired_sessions(&self, user_id: i32, now: DateTime<Utc>) -> Result<u64, AccountError> {
            let mut data = self.lock()?;
            let before = data.sessions.len();
            data.sessions.retain(|_, s| !(s.user_id == user_id && s.is_expired(now)));
            Ok((before - data.sessions.len()) as u64)
        }

        async fn sweep_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AccountError> {
            let mut data = self.lock()?;
            let before = data.sessions.len();
            data.sessions.retain(|_, s| !s.is_expired(now));
            Ok((before - data.sessions.len()) as u64)
        }
    }
}
