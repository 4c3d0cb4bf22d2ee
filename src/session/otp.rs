use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use super::AuthError;

pub const OTP_LENGTH: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Six random digits, zero padded.
#[must_use]
pub fn generate_code() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

#[must_use]
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

/// Delivers a one-time passcode to the address that asked for it.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), AuthError>;
}

/// Writes the code to the log instead of sending mail.
#[derive(Clone, Default)]
pub struct TracingMailer;

#[async_trait]
impl OtpMailer for TracingMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), AuthError> {
        tracing::info!(email, code, "one-time passcode issued");
        Ok(())
    }
}
