//! # User model
//!
//! Two representations of a PixelLift user:
//!
//! - [`User`] (server only) — the full document from the `users` collection,
//!   including the auth provider identity, the Argon2 password hash for local
//!   accounts, and the credit balance. Created on first sign-in, seeded with
//!   [`STARTING_CREDITS`](crate::transform::STARTING_CREDITS).
//! - [`UserInfo`] — the client-safe projection that crosses the server/client
//!   boundary via server functions. Omits the password hash and timestamps and
//!   converts the `ObjectId` to a `String` so it works in WASM.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use mongodb::bson::oid::ObjectId;
#[cfg(feature = "server")]
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Full user document from the `users` collection.
#[cfg(feature = "server")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Auth provider: `"github"` or `"local"`.
    pub provider: String,
    /// Provider-side identity; the email for local accounts.
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub credit_balance: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert to the client-safe projection.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            photo_url: self.photo_url.clone(),
            credit_balance: self.credit_balance,
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub credit_balance: i64,
}

impl UserInfo {
    /// Display name: first name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(&self.username)
    }
}
