use std::fmt;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::database_credentials::{
    domain::model::entities::access_token::AccessToken,
    infrastructure::identity::access_token_claims::extract_username_from_token,
};

const PRINCIPAL_CLAIM: &str = "upn";

#[derive(Clone, Eq, PartialEq)]
pub struct DatabaseCredentials {
    principal: Option<String>,
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl DatabaseCredentials {
    pub fn new(
        principal: Option<String>,
        secret: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            principal,
            secret,
            expires_at,
        }
    }

    pub fn from_access_token(access_token: &AccessToken) -> Self {
        Self {
            principal: extract_username_from_token(&access_token.token, PRINCIPAL_CLAIM),
            secret: access_token.token.clone(),
            expires_at: Some(access_token.expires_at),
        }
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True while the credentials stay usable for at least `margin`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at
            .map_or(true, |expires_at| expires_at - margin > now)
    }

    /// Short SHA-256 prefix of the secret, safe to log.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("principal", &self.principal)
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
