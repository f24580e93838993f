//! OAuth configuration from environment variables.

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};

use crate::error::ApiError;

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
}

impl OAuthConfig {
    /// Create GitHub OAuth config from environment variables.
    pub fn github() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let client_id = std::env::var("GITHUB_CLIENT_ID")
            .map_err(|_| ApiError::Config("GITHUB_CLIENT_ID must be set"))?;
        let client_secret = std::env::var("GITHUB_CLIENT_SECRET")
            .map_err(|_| ApiError::Config("GITHUB_CLIENT_SECRET must be set"))?;
        let redirect_uri = std::env::var("AUTH_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/auth/github/callback".to_string());

        Ok(Self {
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            auth_url: AuthUrl::new("https://github.com/login/oauth/authorize".to_string())
                .map_err(|e| ApiError::Auth(e.to_string()))?,
            token_url: TokenUrl::new("https://github.com/login/oauth/access_token".to_string())
                .map_err(|e| ApiError::Auth(e.to_string()))?,
            redirect_url: RedirectUrl::new(redirect_uri)
                .map_err(|e| ApiError::Auth(e.to_string()))?,
        })
    }
}
