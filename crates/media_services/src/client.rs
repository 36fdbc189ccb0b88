use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::types::{MediaConfig, MediaError, StoredImage};

/// Durable image storage: upload bytes, get back a URL plus a deletion
/// handle; delete by handle.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads the file, returning its public URL and deletion handle.
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<StoredImage, MediaError>;

    /// Deletes the asset identified by the given handle.
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Image storage client backed by the Cloudinary upload API.
pub struct CloudinaryStore {
    client: Client,
    config: MediaConfig,
}

/// Response from a successful upload
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Durable HTTPS URL of the stored image
    pub secure_url: String,
    /// Handle needed to delete the asset later
    pub public_id: String,
}

/// Response from a destroy call
#[derive(Debug, Deserialize)]
pub struct DestroyResponse {
    /// "ok" on success, "not found" when the asset is already gone
    pub result: String,
}

impl CloudinaryStore {
    /// Creates a new storage client from the given configuration.
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MediaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.config.base_url, self.config.cloud_name, action
        )
    }
}

/// Builds the signature for an API request.
///
/// Parameters are sorted by name and joined as `k=v` pairs with `&`, the API
/// secret is appended, and the whole string is SHA-256 hashed to hex. The
/// `api_key`, `file` and `signature` parameters never participate.
pub fn sign_request(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let joined = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    let hash = Sha256::digest(format!("{}{}", joined, api_secret).as_bytes());
    format!("{hash:x}")
}

#[async_trait::async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<StoredImage, MediaError> {
        debug!("Uploading image {} ({} bytes)", filename, bytes.len());

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_request(
            &[
                ("timestamp", &timestamp),
                ("signature_algorithm", "sha256"),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature)
            .part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("HTTP {}: {}", status, body)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(format!("Failed to parse response: {}", e)))?;

        Ok(StoredImage {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        debug!("Deleting stored image {}", public_id);

        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_request(
            &[
                ("public_id", public_id),
                ("timestamp", &timestamp),
                ("signature_algorithm", "sha256"),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Image delete for {} failed with HTTP {}", public_id, status);
            return Err(MediaError::Delete(format!("HTTP {}", status)));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Delete(format!("Failed to parse response: {}", e)))?;

        // An already-deleted asset counts as deleted.
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => {
                warn!("Image delete for {} returned {:?}", public_id, other);
                Err(MediaError::Delete(other.to_string()))
            }
        }
    }
}
