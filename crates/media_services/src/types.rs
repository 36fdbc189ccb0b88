/// A stored image: its public URL and the opaque handle needed to delete it.
///
/// The two always travel together; a campground either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Durable, publicly reachable URL of the image
    pub url: String,
    /// Opaque handle used to delete this specific asset later
    pub public_id: String,
}

/// An uploaded file as received from the client, prior to storage.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as submitted
    pub filename: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

/// Configuration for the image storage client.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Cloud name identifying the storage account
    pub cloud_name: String,
    /// API key for the storage account
    pub api_key: String,
    /// API secret used to sign requests
    pub api_secret: String,
    /// Base URL of the storage API
    pub base_url: String,
}

impl MediaConfig {
    /// Loads the configuration from `CLOUDINARY_CLOUD_NAME`,
    /// `CLOUDINARY_API_KEY` and `CLOUDINARY_API_SECRET`.
    pub fn from_env() -> Result<Self, MediaError> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| MediaError::Config("CLOUDINARY_CLOUD_NAME is not set".to_string()))?;
        let api_key = std::env::var("CLOUDINARY_API_KEY")
            .map_err(|_| MediaError::Config("CLOUDINARY_API_KEY is not set".to_string()))?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| MediaError::Config("CLOUDINARY_API_SECRET is not set".to_string()))?;
        let base_url = std::env::var("CLOUDINARY_BASE_URL")
            .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string());

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            base_url,
        })
    }
}

/// Custom error type for image storage operations
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The storage service rejected or failed an upload
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// The storage service rejected or failed a deletion
    #[error("Image deletion failed: {0}")]
    Delete(String),

    /// The HTTP request itself failed
    #[error("Image storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The client configuration is incomplete
    #[error("Image storage configuration error: {0}")]
    Config(String),
}
