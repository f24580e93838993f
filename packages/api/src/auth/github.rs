//! # GitHub OAuth 2.0
//!
//! Authorization Code flow with PKCE.
//!
//! 1. [`generate_auth_url`](GitHubOAuth::generate_auth_url) builds the
//!    authorization URL with the `user:email` and `read:user` scopes, generates
//!    a random PKCE challenge, and persists the CSRF state + verifier in the
//!    `oauth_states` collection with a 10-minute expiry.
//! 2. [`exchange_code`](GitHubOAuth::exchange_code) is called by the
//!    `/auth/github/callback` route in the `web` crate. It consumes the stored
//!    state (validating CSRF and expiry in one `find_one_and_delete`), exchanges
//!    the code + verifier for an access token, fetches the profile (falling
//!    back to `/user/emails` for the primary verified address) and upserts the
//!    user. First sign-ins are seeded with the starting credit balance;
//!    returning users get their profile fields refreshed.

use chrono::{Duration, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use reqwest::Client;
use serde::Deserialize;

use super::config::OAuthConfig;
use super::OAuthState;
use crate::db;
use crate::error::ApiError;
use crate::models::User;
use crate::transform::STARTING_CREDITS;

/// GitHub user info from API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    email: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// GitHub email info from API.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// GitHub OAuth handler.
pub struct GitHubOAuth {
    config: OAuthConfig,
}

impl GitHubOAuth {
    pub fn new() -> Result<Self, ApiError> {
        let config = OAuthConfig::github()?;
        Ok(Self { config })
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Generate the authorization URL with PKCE, persisting the handshake.
    pub async fn generate_auth_url(&self) -> Result<String, ApiError> {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("user:email".to_string()))
            .add_scope(Scope::new("read:user".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        let db = db::get().await?;
        db.oauth_states()
            .insert_one(OAuthState {
                state: csrf_state.secret().clone(),
                provider: "github".to_string(),
                pkce_verifier: pkce_verifier.secret().clone(),
                expires_at: Utc::now() + Duration::minutes(10),
            })
            .await?;

        Ok(auth_url.to_string())
    }

    /// Exchange the authorization code for tokens and upsert the user.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<User, ApiError> {
        let db = db::get().await?;

        // Consume the handshake; expired rows do not match.
        let stored = db
            .oauth_states()
            .find_one_and_delete(doc! {
                "state": state,
                "provider": "github",
                "expires_at": { "$gt": BsonDateTime::now() },
            })
            .await?
            .ok_or(ApiError::Auth("invalid or expired OAuth state".to_string()))?;

        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        let client = self.create_client();

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(stored.pkce_verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| ApiError::Auth(format!("token exchange failed: {e}")))?;

        let access_token = token_result.access_token().secret();

        let api_client = Client::new();

        let github_user: GitHubUser = api_client
            .get("https://api.github.com/user")
            .header("Authorization", format!("Bearer {access_token}"))
            .header("User-Agent", "PixelLift")
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?
            .json()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        // Get the primary email if the profile hides it.
        let email = match github_user.email {
            Some(email) => email,
            None => {
                let emails: Vec<GitHubEmail> = api_client
                    .get("https://api.github.com/user/emails")
                    .header("Authorization", format!("Bearer {access_token}"))
                    .header("User-Agent", "PixelLift")
                    .send()
                    .await
                    .map_err(|e| ApiError::Auth(e.to_string()))?
                    .json()
                    .await
                    .map_err(|e| ApiError::Auth(e.to_string()))?;

                emails
                    .into_iter()
                    .find(|e| e.primary && e.verified)
                    .map(|e| e.email)
                    .ok_or(ApiError::Auth("no verified primary email found".to_string()))?
            }
        };

        let (first_name, last_name) = split_name(github_user.name.as_deref());
        let provider_id = github_user.id.to_string();
        let users = db.users();

        if let Some(existing) = users
            .find_one(doc! { "provider": "github", "provider_id": &provider_id })
            .await?
        {
            // Returning user: refresh profile fields, keep the balance.
            users
                .update_one(
                    doc! { "_id": existing.id },
                    doc! { "$set": {
                        "email": &email,
                        "first_name": first_name.as_deref(),
                        "last_name": last_name.as_deref(),
                        "photo_url": github_user.avatar_url.as_deref(),
                        "updated_at": BsonDateTime::now(),
                    }},
                )
                .await?;
            users
                .find_one(doc! { "_id": existing.id })
                .await?
                .ok_or(ApiError::NotFound("user"))
        } else {
            let now = Utc::now();
            let mut user = User {
                id: None,
                email,
                username: github_user.login,
                first_name,
                last_name,
                photo_url: github_user.avatar_url,
                provider: "github".to_string(),
                provider_id,
                password_hash: None,
                credit_balance: STARTING_CREDITS,
                created_at: now,
                updated_at: now,
            };
            let inserted = users.insert_one(&user).await?;
            user.id = inserted.inserted_id.as_object_id();
            Ok(user)
        }
    }
}

fn split_name(full: Option<&str>) -> (Option<String>, Option<String>) {
    match full {
        Some(name) => match name.split_once(' ') {
            Some((first, last)) => (Some(first.to_string()), Some(last.to_string())),
            None => (Some(name.to_string()), None),
        },
        None => (None, None),
    }
}
