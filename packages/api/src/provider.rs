//! Upload client for the image-processing provider.
//!
//! Uploads go to the provider's unsigned upload endpoint; transformations are
//! never uploaded, they are encoded into delivery URLs (see
//! [`delivery`](crate::delivery)).

use reqwest::multipart;
use serde::Deserialize;

use crate::error::ApiError;
use crate::UploadedAsset;

/// Client for the provider's upload REST API.
pub struct ProviderClient {
    cloud_name: String,
    upload_preset: String,
    http: reqwest::Client,
}

impl ProviderClient {
    /// Build from `CLOUDINARY_CLOUD_NAME` and `CLOUDINARY_UPLOAD_PRESET`.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| ApiError::Config("CLOUDINARY_CLOUD_NAME must be set"))?;
        let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET")
            .map_err(|_| ApiError::Config("CLOUDINARY_UPLOAD_PRESET must be set"))?;

        Ok(Self {
            cloud_name,
            upload_preset,
            http: reqwest::Client::new(),
        })
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// Upload raw image bytes; returns the provider's asset handle.
    pub async fn upload(&self, file_name: &str, data: Vec<u8>) -> Result<UploadedAsset, ApiError> {
        #[derive(Debug, Deserialize)]
        struct UploadResponse {
            public_id: String,
            secure_url: String,
            width: u32,
            height: u32,
        }

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );
        let form = multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part(
                "file",
                multipart::Part::bytes(data).file_name(file_name.to_string()),
            );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Provider(format!(
                "upload failed with {status}: {body}"
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        Ok(UploadedAsset {
            public_id: parsed.public_id,
            secure_url: parsed.secure_url,
            width: parsed.width,
            height: parsed.height,
        })
    }
}
