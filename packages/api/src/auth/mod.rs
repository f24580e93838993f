//! Authentication: GitHub OAuth and local email+password accounts.

#[cfg(feature = "server")]
mod config;
#[cfg(feature = "server")]
mod github;
#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use config::OAuthConfig;
#[cfg(feature = "server")]
pub use github::GitHubOAuth;
#[cfg(feature = "server")]
pub use password::{hash_password, verify_password};
#[cfg(feature = "server")]
pub use session::SESSION_USER_ID_KEY;

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
#[cfg(feature = "server")]
use serde::{Deserialize, Serialize};

/// Pending OAuth handshake stored in the `oauth_states` collection.
///
/// Written when the authorization URL is generated and consumed (deleted)
/// when the provider calls back; rows past `expires_at` are treated as absent.
#[cfg(feature = "server")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    pub state: String,
    pub provider: String,
    pub pkce_verifier: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,
}
