use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::{debug, info, instrument, warn};

use super::domain::{Account, AuthSession, LoginInput, NewAccount, ProfileChanges, RegisterInput, SessionContext};
use super::errors::AccountError;
use super::repository::AccountStore;

/// Length of generated session tokens.
pub const SESSION_TOKEN_LEN: usize = 40;

/// Account service configuration
#[derive(Clone)]
pub struct AccountConfig {
    pub session_ttl: Duration,
    pub password_algorithm: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self { session_ttl: Duration::days(14), password_algorithm: "argon2".into() }
    }
}

/// Account business service independent of web framework
pub struct AccountService<R: AccountStore + ?Sized> {
    repo: Arc<R>,
    cfg: AccountConfig,
}

/// Hash checked when the username is unknown, so every failed login costs one verification.
static DECOY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"no-such-account", &salt)
        .ok()
        .map(|h| h.to_string())
});

/// Returns false only if the decoy hash could not be built.
fn verify_against_decoy(password: &str) -> bool {
    let Some(hash) = DECOY_HASH.as_deref() else { return false };
    let Ok(parsed) = PasswordHash::new(hash) else { return false };
    let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    true
}

fn new_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

impl<R: AccountStore + ?Sized> AccountService<R> {
    pub fn new(repo: Arc<R>, cfg: AccountConfig) -> Self {
        Lazy::force(&DECOY_HASH);
        Self { repo, cfg }
    }

    /// Register a new account with a hashed password and an attached profile.
    ///
    /// # Examples
    /// ```
    /// use service::account::{AccountService, AccountConfig, repository::mock::MockAccountStore};
    /// use service::account::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAccountStore::default());
    /// let svc = AccountService::new(repo, AccountConfig::default());
    /// let input = RegisterInput {
    ///     username: "ana".into(), email: "ana@example.com".into(),
    ///     password: "Secreta123".into(), password_confirm: "Secreta123".into(),
    ///     first_name: "Ana".into(), last_name: String::new(),
    ///     phone: "3001234567".into(), address: String::new(),
    /// };
    /// let account = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(account.user.username, "ana");
    /// assert_eq!(account.profile.phone, "3001234567");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<Account, AccountError> {
        if input.password != input.password_confirm {
            return Err(AccountError::validation("password_confirm", "Las contraseñas no coinciden"));
        }
        models::user::validate_username(&input.username)
            .map_err(|e| AccountError::validation("username", e.to_string()))?;
        models::user::validate_email(&input.email)
            .map_err(|e| AccountError::validation("email", e.to_string()))?;
        models::user::validate_name_part(&input.first_name)
            .map_err(|e| AccountError::validation("first_name", e.to_string()))?;
        models::user::validate_name_part(&input.last_name)
            .map_err(|e| AccountError::validation("last_name", e.to_string()))?;
        if input.password.is_empty() {
            return Err(AccountError::validation("password", "Este campo no puede estar en blanco."));
        }
        models::profile::validate_phone(&input.phone)
            .map_err(|e| AccountError::validation("telefono", e.to_string()))?;
        if let Some(existing) = self.repo.find_user_by_username(&input.username).await? {
            debug!("user exists: {}", existing.username);
            return Err(AccountError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AccountError::HashError(e.to_string()))?
            .to_string();

        let account = self
            .repo
            .create_account(NewAccount {
                username: input.username,
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
                address: input.address,
                password_hash: hash,
                password_algorithm: self.cfg.password_algorithm.clone(),
            })
            .await?;
        info!(user_id = account.user.id, username = %account.user.username, "user_registered");
        Ok(account)
    }

    /// Verify credentials and open a session.
    ///
    /// # Examples
    /// ```
    /// use service::account::{AccountService, AccountConfig, repository::mock::MockAccountStore};
    /// use service::account::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AccountService::new(Arc::new(MockAccountStore::default()), AccountConfig::default());
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: "luis".into(), email: "luis@example.com".into(),
    ///     password: "Passw0rd".into(), password_confirm: "Passw0rd".into(),
    ///     first_name: String::new(), last_name: String::new(), phone: String::new(), address: String::new(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "luis".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.account.user.username, "luis");
    /// assert_eq!(session.token.len(), 40);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AccountError> {
        let Some(user) = self.repo.find_user_by_username(&input.username).await? else {
            verify_against_decoy(&input.password);
            warn!("login failed");
            return Err(AccountError::InvalidCredentials);
        };

        let Some(cred) = self.repo.get_credentials(user.id).await? else {
            verify_against_decoy(&input.password);
            warn!(user_id = user.id, "login failed: no credentials");
            return Err(AccountError::InvalidCredentials);
        };

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AccountError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            warn!(user_id = user.id, "login failed");
            return Err(AccountError::InvalidCredentials);
        }

        let now = Utc::now();
        let pruned = self.repo.delete_expired_sessions(user.id, now).await?;
        let token = new_session_token();
        let session = self.repo.create_session(&token, user.id, now + self.cfg.session_ttl).await?;
        self.repo.record_login(user.id, now).await?;
        let account = self.repo.get_account(user.id).await?.ok_or(AccountError::InvalidCredentials)?;
        info!(user_id = user.id, pruned, "user_logged_in");
        Ok(AuthSession { account, token: session.token, expires_at: session.expires_at })
    }

    /// Resolve a session token. Expired sessions are deleted on sight.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<SessionContext, AccountError> {
        if token.is_empty() {
            return Err(AccountError::Unauthorized);
        }
        let session = self.repo.find_session(token).await?.ok_or(AccountError::Unauthorized)?;
        if session.is_expired(Utc::now()) {
            self.repo.delete_session(token).await?;
            debug!(user_id = session.user_id, "expired session removed");
            return Err(AccountError::Unauthorized);
        }
        Ok(SessionContext { token: session.token, user_id: session.user_id, expires_at: session.expires_at })
    }

    /// Delete expired sessions of all users. Returns how many were removed.
    #[instrument(skip_all)]
    pub async fn sweep_expired_sessions(&self) -> Result<u64, AccountError> {
        let removed = self.repo.sweep_expired_sessions(Utc::now()).await?;
        info!(removed, "expired_sessions_swept");
        Ok(removed)
    }

    #[instrument(skip(self, ctx), fields(user_id = ctx.user_id))]
    pub async fn logout(&self, ctx: &SessionContext) -> Result<(), AccountError> {
        if !self.repo.delete_session(&ctx.token).await? {
            return Err(AccountError::Unauthorized);
        }
        info!("user_logged_out");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(user_id = ctx.user_id))]
    pub async fn get_profile(&self, ctx: &SessionContext) -> Result<Account, AccountError> {
        self.repo.get_account(ctx.user_id).await?.ok_or(AccountError::Unauthorized)
    }

    /// Apply a partial update to the caller's own user and profile.
    #[instrument(skip(self, ctx, changes), fields(user_id = ctx.user_id))]
    pub async fn update_profile(&self, ctx: &SessionContext, changes: ProfileChanges) -> Result<Account, AccountError> {
        if let Some(username) = &changes.username {
            models::user::validate_username(username)
                .map_err(|e| AccountError::validation("username", e.to_string()))?;
            if let Some(other) = self.repo.find_user_by_username(username).await? {
                if other.id != ctx.user_id {
                    return Err(AccountError::Conflict);
                }
            }
        }
        if let Some(email) = &changes.email {
            models::user::validate_email(email).map_err(|e| AccountError::validation("email", e.to_string()))?;
        }
        if let Some(first_name) = &changes.first_name {
            models::user::validate_name_part(first_name)
                .map_err(|e| AccountError::validation("first_name", e.to_string()))?;
        }
        if let Some(last_name) = &changes.last_name {
            models::user::validate_name_part(last_name)
                .map_err(|e| AccountError::validation("last_name", e.to_string()))?;
        }
        if let Some(phone) = &changes.phone {
            models::profile::validate_phone(phone).map_err(|e| AccountError::validation("telefono", e.to_string()))?;
        }
        let account = self.repo.update_account(ctx.user_id, &changes).await?;
        info!("profile_updated");
        Ok(account)
    }
}
