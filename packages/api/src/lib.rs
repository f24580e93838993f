//! # API crate — shared fullstack server functions for PixelLift
//!
//! This crate is the backbone of the PixelLift fullstack architecture. It
//! defines every Dioxus server function that the web frontend calls, along with
//! the supporting modules they depend on.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`actions`] | `server` | CRUD over the `users`/`images` collections, credit debits |
//! | [`auth`] | — | GitHub OAuth and local password authentication, session key |
//! | [`db`] | `server` | MongoDB connection handle (lazy `OnceCell` singleton) |
//! | [`delivery`] | — | Provider delivery-URL construction from a transformation config |
//! | [`models`] | — | Database models (`User`, `Image`) and their client-safe projections |
//! | [`provider`] | `server` | Upload client for the image-processing provider |
//! | [`revalidate`] | — | Path-keyed staleness registry behind the gallery cache |
//! | [`transform`] | — | Transformation types, configuration, and deep-merge |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` in this file is a Dioxus server function, compiled
//! twice: once with full server logic (behind `#[cfg(feature = "server")]`
//! inside the macro) and once as a thin client stub that forwards the call
//! over HTTP.
//!
//! - **Authentication**: `get_current_user`, `get_login_url`, `logout`,
//!   `register`, `login_password`
//! - **Images**: `add_image`, `update_image`, `delete_image`,
//!   `get_image_by_id`, `get_image_gallery`, `get_user_images`
//! - **Credits**: `update_credits`
//! - **Provider**: `provider_config`, `upload_asset`

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
pub mod actions;
pub mod auth;
#[cfg(feature = "server")]
pub mod db;
pub mod delivery;
#[cfg(feature = "server")]
mod error;
pub mod models;
#[cfg(feature = "server")]
pub mod provider;
pub mod revalidate;
pub mod transform;

#[cfg(feature = "server")]
pub use error::ApiError;
pub use models::{ImageAuthor, ImageDetail, ImageInfo, UserInfo};
pub use transform::{
    AspectRatio, TransformationConfig, TransformationType, STARTING_CREDITS, TRANSFORM_FEE,
};

/// Page path of the home gallery, the one listing that is served from cache.
pub const HOME_PATH: &str = "/";

/// Fields submitted by the transformation form when saving an image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageForm {
    pub title: String,
    pub public_id: String,
    pub transformation_type: String,
    pub width: u32,
    pub height: u32,
    pub config: TransformationConfig,
    pub secure_url: String,
    pub transformation_url: String,
    pub aspect_ratio: Option<String>,
    pub prompt: Option<String>,
    pub color: Option<String>,
}

/// One page of gallery results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryPage {
    pub images: Vec<ImageInfo>,
    pub total_pages: u64,
}

/// An asset freshly uploaded to the image-processing provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedAsset {
    pub public_id: String,
    pub secure_url: String,
    pub width: u32,
    pub height: u32,
}

/// Provider settings the client needs to build delivery URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    pub cloud_name: String,
}

// ---------------------------------------------------------------------------
// Session helpers (server only)
// ---------------------------------------------------------------------------

/// The request's session, from the tower-sessions layer.
#[cfg(feature = "server")]
async fn session() -> Result<tower_sessions::Session, ServerFnError> {
    extract::<tower_sessions::Session, _>()
        .await
        .map_err(|_| ServerFnError::new("session layer missing"))
}

/// Current session user id, if signed in.
#[cfg(feature = "server")]
async fn session_user_id() -> Result<Option<mongodb::bson::oid::ObjectId>, ServerFnError> {
    let session = session().await?;
    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(ApiError::from)?;

    match user_id {
        Some(id) => Ok(Some(
            mongodb::bson::oid::ObjectId::parse_str(&id).map_err(ApiError::from)?,
        )),
        None => Ok(None),
    }
}

/// Current session user id; fails `unauthorized` when signed out.
#[cfg(feature = "server")]
async fn require_user() -> Result<mongodb::bson::oid::ObjectId, ServerFnError> {
    session_user_id()
        .await?
        .ok_or_else(|| ApiError::Unauthorized.into())
}

#[cfg(feature = "server")]
async fn shared_db() -> Result<&'static db::Db, ServerFnError> {
    db::get().await.map_err(Into::into)
}

#[cfg(feature = "server")]
fn log_failure(action: &str, err: &ApiError) {
    tracing::error!("{action}: {err}");
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Get the current authenticated user from the session.
#[server]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    let Some(user_id) = session_user_id().await? else {
        return Ok(None);
    };

    let db = shared_db().await?;
    let user = db
        .users()
        .find_one(mongodb::bson::doc! { "_id": user_id })
        .await
        .map_err(ApiError::from)?;

    Ok(user.map(|u| u.to_info()))
}

/// Get the OAuth login URL for a provider.
#[server]
pub async fn get_login_url(provider: String) -> Result<String, ServerFnError> {
    match provider.as_str() {
        "github" => {
            let oauth = auth::GitHubOAuth::new().map_err(ServerFnError::new)?;
            let url = oauth
                .generate_auth_url()
                .await
                .map_err(|e| -> ServerFnError {
                    log_failure("get_login_url", &e);
                    e.into()
                })?;
            Ok(url)
        }
        _ => Err(ServerFnError::new(format!("unknown provider: {provider}"))),
    }
}

/// Log out the current user by clearing the session.
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    let session = session().await?;
    session.flush().await.map_err(ApiError::from)?;
    Ok(())
}

/// Register a new local account. First sign-in seeds the credit balance.
#[server]
pub async fn register(
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> Result<UserInfo, ServerFnError> {
    use mongodb::bson::doc;

    let email = email.trim().to_lowercase();
    let first_name = first_name.trim().to_string();
    let last_name = last_name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(ServerFnError::new("Invalid email address"));
    }
    if password.len() < 8 {
        return Err(ServerFnError::new("Password must be at least 8 characters"));
    }

    let db = shared_db().await?;
    let users = db.users();

    let existing = users
        .find_one(doc! { "provider": "local", "provider_id": &email })
        .await
        .map_err(ApiError::from)?;
    if existing.is_some() {
        return Err(ServerFnError::new(
            "An account with this email already exists",
        ));
    }

    let password_hash = auth::hash_password(&password).map_err(ServerFnError::new)?;
    let username = email.split('@').next().unwrap_or(&email).to_string();

    let now = chrono::Utc::now();
    let mut user = models::User {
        id: None,
        email: email.clone(),
        username,
        first_name: (!first_name.is_empty()).then_some(first_name),
        last_name: (!last_name.is_empty()).then_some(last_name),
        photo_url: None,
        provider: "local".to_string(),
        provider_id: email,
        password_hash: Some(password_hash),
        credit_balance: STARTING_CREDITS,
        created_at: now,
        updated_at: now,
    };
    let inserted = users.insert_one(&user).await.map_err(ApiError::from)?;
    user.id = inserted.inserted_id.as_object_id();

    let session = session().await?;
    session
        .insert(auth::SESSION_USER_ID_KEY, user.to_info().id)
        .await
        .map_err(ApiError::from)?;

    Ok(user.to_info())
}

/// Log in with email and password.
#[server]
pub async fn login_password(email: String, password: String) -> Result<UserInfo, ServerFnError> {
    use mongodb::bson::doc;

    let email = email.trim().to_lowercase();
    let db = shared_db().await?;

    let user = db
        .users()
        .find_one(doc! { "provider": "local", "provider_id": &email })
        .await
        .map_err(ApiError::from)?;

    let Some(user) = user else {
        return Err(ServerFnError::new("Invalid email or password"));
    };
    let Some(ref hash) = user.password_hash else {
        return Err(ServerFnError::new("Invalid email or password"));
    };

    let valid = auth::verify_password(&password, hash).map_err(ServerFnError::new)?;
    if !valid {
        return Err(ServerFnError::new("Invalid email or password"));
    }

    let session = session().await?;
    session
        .insert(auth::SESSION_USER_ID_KEY, user.to_info().id)
        .await
        .map_err(ApiError::from)?;

    Ok(user.to_info())
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Create an image record for the signed-in user, then mark `path` stale.
#[server]
pub async fn add_image(form: ImageForm, path: String) -> Result<ImageInfo, ServerFnError> {
    let author = require_user().await?;
    let db = shared_db().await?;

    actions::add_image(db, author, form, &path)
        .await
        .map_err(|e| {
            log_failure("add_image", &e);
            e.into()
        })
}

/// Replace an image's fields; only its owner may do so. Marks `path` stale.
#[server]
pub async fn update_image(
    image_id: String,
    form: ImageForm,
    path: String,
) -> Result<ImageInfo, ServerFnError> {
    let acting_user = require_user().await?;
    let db = shared_db().await?;

    actions::update_image(db, acting_user, &image_id, form, &path)
        .await
        .map_err(|e| {
            log_failure("update_image", &e);
            e.into()
        })
}

/// Delete an image by id. The calling view redirects home regardless of the
/// outcome.
#[server]
pub async fn delete_image(image_id: String) -> Result<(), ServerFnError> {
    require_user().await?;
    let db = shared_db().await?;

    actions::delete_image(db, &image_id).await.map_err(|e| {
        log_failure("delete_image", &e);
        e.into()
    })
}

/// Load one image with its author's name fields.
#[server]
pub async fn get_image_by_id(image_id: String) -> Result<ImageDetail, ServerFnError> {
    let db = shared_db().await?;

    actions::get_image_by_id(db, &image_id).await.map_err(|e| {
        log_failure("get_image_by_id", &e);
        e.into()
    })
}

/// The home gallery cache: answers the unfiltered first page until a mutating
/// action marks `/` stale.
#[cfg(feature = "server")]
static HOME_GALLERY: std::sync::LazyLock<
    std::sync::RwLock<Option<revalidate::Cached<GalleryPage>>>,
> = std::sync::LazyLock::new(|| std::sync::RwLock::new(None));

/// Paginated listing of all images for the home gallery, optionally filtered
/// by title.
#[server]
pub async fn get_image_gallery(
    search_query: Option<String>,
    page: u32,
) -> Result<GalleryPage, ServerFnError> {
    let cacheable = search_query.as_deref().is_none_or(|q| q.is_empty()) && page <= 1;
    if cacheable {
        let cached = HOME_GALLERY.read().expect("gallery cache poisoned");
        if let Some(entry) = cached.as_ref() {
            if entry.is_fresh(HOME_PATH) {
                return Ok(entry.value.clone());
            }
        }
    }

    let db = shared_db().await?;
    let result = actions::gallery(db, search_query.as_deref(), page)
        .await
        .map_err(|e| -> ServerFnError {
            log_failure("get_image_gallery", &e);
            e.into()
        })?;

    if cacheable {
        let mut cached = HOME_GALLERY.write().expect("gallery cache poisoned");
        *cached = Some(revalidate::Cached::fill(HOME_PATH, result.clone()));
    }

    Ok(result)
}

/// Paginated listing of the signed-in user's images.
#[server]
pub async fn get_user_images(page: u32) -> Result<GalleryPage, ServerFnError> {
    let user = require_user().await?;
    let db = shared_db().await?;

    actions::user_images(db, user, page).await.map_err(|e| {
        log_failure("get_user_images", &e);
        e.into()
    })
}

// ---------------------------------------------------------------------------
// Credits
// ---------------------------------------------------------------------------

/// Debit `fee` credits from the signed-in user's balance; returns the new
/// balance. Refuses to take the balance negative.
#[server]
pub async fn update_credits(fee: i64) -> Result<i64, ServerFnError> {
    let user = require_user().await?;
    let db = shared_db().await?;

    actions::update_credits(db, user, fee).await.map_err(|e| {
        log_failure("update_credits", &e);
        e.into()
    })
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Provider settings the client needs to build delivery URLs.
#[server(ProviderConfigFn)]
pub async fn provider_config() -> Result<ProviderConfig, ServerFnError> {
    let client = provider::ProviderClient::from_env().map_err(ServerFnError::new)?;
    Ok(ProviderConfig {
        cloud_name: client.cloud_name().to_string(),
    })
}

/// Upload a picked file to the image-processing provider.
#[server]
pub async fn upload_asset(file_name: String, data: Vec<u8>) -> Result<UploadedAsset, ServerFnError> {
    require_user().await?;

    let client = provider::ProviderClient::from_env().map_err(ServerFnError::new)?;
    client.upload(&file_name, data).await.map_err(|e| {
        log_failure("upload_asset", &e);
        e.into()
    })
}
