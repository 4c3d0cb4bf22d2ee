use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Account, Player};
use crate::storage::{Storage, StorageError};

pub mod otp;

pub use otp::{OtpMailer, TracingMailer, generate_code, is_valid_email};

pub const SESSION_COOKIE: &str = "golf_session";
/// Wrong guesses allowed before a pending code is thrown away.
pub const MAX_OTP_ATTEMPTS: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Could not send the code: {0}")]
    SendFailed(String),
    #[error("Invalid code, please try again")]
    InvalidCode,
    #[error("This code has expired, please request a new one")]
    ExpiredCode,
    #[error("Too many attempts, please request a new code")]
    TooManyAttempts,
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// The signed-in identity and, once created, its player profile.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub account: Account,
    pub player: Option<Player>,
}

#[derive(Clone)]
struct PendingCode {
    code: String,
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
}

#[derive(Clone)]
struct SessionRecord {
    account_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Passwordless login state: codes awaiting verification and live sessions.
#[derive(Clone)]
pub struct SessionStore {
    pending: Arc<RwLock<HashMap<String, PendingCode>>>,
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    mailer: Arc<dyn OtpMailer>,
    otp_ttl: chrono::Duration,
    session_ttl: chrono::Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        mailer: Arc<dyn OtpMailer>,
        otp_ttl: chrono::Duration,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            mailer,
            otp_ttl,
            session_ttl,
        }
    }

    /// Issues a fresh code for `email`, creating the account on first use.
    /// A new request replaces any code still pending for the address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the address is invalid, the account cannot be stored or delivery fails
    pub async fn send_otp(&self, storage: &dyn Storage, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        storage.find_or_create_account(&email).await?;

        let code = generate_code();
        {
            let mut pending = self.pending.write().await;
            let now = Utc::now();
            pending.retain(|_, p| p.expires_at > now);
            pending.insert(
                email.clone(),
                PendingCode {
                    code: code.clone(),
                    expires_at: now + self.otp_ttl,
                    failed_attempts: 0,
                },
            );
        }
        self.mailer.send_code(&email, &code).await
    }

    /// Consumes a pending code and opens a session, returning its token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for a wrong, unknown or expired code
    pub async fn verify_otp(
        &self,
        storage: &dyn Storage,
        email: &str,
        code: &str,
    ) -> Result<String, AuthError> {
        let email = normalize_email(email);
        let code = code.trim();
        if !otp::is_well_formed_code(code) {
            return Err(AuthError::InvalidCode);
        }

        {
            let mut pending = self.pending.write().await;
            let Some(entry) = pending.get_mut(&email) else {
                return Err(AuthError::InvalidCode);
            };
            if entry.expires_at <= Utc::now() {
                pending.remove(&email);
                return Err(AuthError::ExpiredCode);
            }
            if entry.code != code {
                entry.failed_attempts += 1;
                if entry.failed_attempts >= MAX_OTP_ATTEMPTS {
                    pending.remove(&email);
                    tracing::warn!(email = %email, "pending code dropped after repeated failures");
                    return Err(AuthError::TooManyAttempts);
                }
                return Err(AuthError::InvalidCode);
            }
            pending.remove(&email);
        }

        let account = storage.find_or_create_account(&email).await?;
        let token = Uuid::new_v4().to_string();
        {
            let mut sessions = self.sessions.write().await;
            let now = Utc::now();
            sessions.retain(|_, s| s.expires_at > now);
            sessions.insert(
                token.clone(),
                SessionRecord {
                    account_id: account.id,
                    expires_at: now + self.session_ttl,
                },
            );
        }
        tracing::info!(account_id = %account.id, "session opened");
        Ok(token)
    }

    /// Resolves a session token. Unknown or expired tokens give `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` when the account or player cannot be read
    pub async fn load(
        &self,
        storage: &dyn Storage,
        token: &str,
    ) -> Result<Option<Session>, AuthError> {
        let record = {
            let sessions = self.sessions.read().await;
            sessions.get(token).cloned()
        };
        let Some(record) = record else {
            return Ok(None);
        };
        if record.expires_at <= Utc::now() {
            self.clear(token).await;
            return Ok(None);
        }

        let account = match storage.get_account(&record.account_id).await {
            Ok(account) => account,
            Err(StorageError::NotFound(_)) => {
                self.clear(token).await;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let player = storage.get_player_by_account(&account.id).await?;
        Ok(Some(Session {
            token: token.to_string(),
            account,
            player,
        }))
    }

    /// Pushes the expiry of a live session forward; false when the token is unknown.
    pub async fn refresh(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(record) if record.expires_at > Utc::now() => {
                record.expires_at = Utc::now() + self.session_ttl;
                true
            }
            _ => false,
        }
    }

    pub async fn clear(&self, token: &str) {
        if self.sessions.write().await.remove(token).is_some() {
            tracing::debug!("session cleared");
        }
    }

    /// Code currently pending for `email`. Only meant for tests and local debugging.
    pub async fn pending_code(&self, email: &str) -> Option<String> {
        let pending = self.pending.read().await;
        pending.get(&normalize_email(email)).map(|p| p.code.clone())
    }

    /// Number of codes and sessions currently held in memory.
    pub async fn held_entries(&self) -> (usize, usize) {
        let pending = self.pending.read().await.len();
        let sessions = self.sessions.read().await.len();
        (pending, sessions)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
