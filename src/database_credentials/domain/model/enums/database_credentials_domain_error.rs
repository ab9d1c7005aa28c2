use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum DatabaseCredentialsDomainError {
    #[error("credential scope is invalid")]
    InvalidCredentialScope,

    #[error("credential scope {requested} is not served by this provider (serves {served})")]
    UnsupportedCredentialScope { requested: String, served: String },

    #[error("access token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("access token response is invalid: {0}")]
    InvalidTokenResponse(String),
}
