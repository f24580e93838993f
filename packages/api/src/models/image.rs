//! # Image model
//!
//! [`Image`] (server only) is the full document from the `images` collection,
//! owned by exactly one user through the `author` reference. [`ImageInfo`] is
//! the client-safe projection; [`ImageDetail`] attaches the author's name
//! fields for the detail view.

use serde::{Deserialize, Serialize};

use crate::transform::{TransformationConfig, TransformationType};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use mongodb::bson::oid::ObjectId;
#[cfg(feature = "server")]
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Full image document from the `images` collection.
#[cfg(feature = "server")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning user.
    pub author: ObjectId,
    pub title: String,
    /// Provider asset id.
    pub public_id: String,
    pub transformation_type: TransformationType,
    pub width: u32,
    pub height: u32,
    /// Accumulated transformation parameters; its populated branch must match
    /// `transformation_type`.
    pub config: TransformationConfig,
    /// Stored, un-transformed URL.
    pub secure_url: String,
    /// Derived URL with the configured transformations applied.
    pub transformation_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl Image {
    /// Convert to the client-safe projection.
    pub fn to_info(&self) -> ImageInfo {
        ImageInfo {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            author_id: self.author.to_hex(),
            title: self.title.clone(),
            public_id: self.public_id.clone(),
            transformation_type: self.transformation_type,
            width: self.width,
            height: self.height,
            config: self.config.clone(),
            secure_url: self.secure_url.clone(),
            transformation_url: self.transformation_url.clone(),
            aspect_ratio: self.aspect_ratio.clone(),
            prompt: self.prompt.clone(),
            color: self.color.clone(),
        }
    }
}

/// Image record safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageInfo {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub public_id: String,
    pub transformation_type: TransformationType,
    pub width: u32,
    pub height: u32,
    pub config: TransformationConfig,
    pub secure_url: String,
    pub transformation_url: String,
    pub aspect_ratio: Option<String>,
    pub prompt: Option<String>,
    pub color: Option<String>,
}

/// The owning user's name fields, attached to [`ImageDetail`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageAuthor {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// An image plus its author, for the detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageDetail {
    pub image: ImageInfo,
    pub author: ImageAuthor,
}
