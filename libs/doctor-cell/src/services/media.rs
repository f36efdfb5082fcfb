use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::ImageUpload;

pub const DOCTOR_IMAGE_FOLDER: &str = "doctors";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed uploads to the Cloudinary image API.
pub struct MediaService {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl MediaService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.cloudinary_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    /// Upload an image and return its stable HTTPS URL.
    pub async fn upload_image(&self, image: &ImageUpload) -> Result<String> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(anyhow!("Cloudinary credentials are not configured"));
        }

        debug!("Uploading image {} ({} bytes)", image.file_name, image.bytes.len());

        let timestamp = Utc::now().timestamp();
        let signature = sign_params(
            &[("folder", DOCTOR_IMAGE_FOLDER.to_string()), ("timestamp", timestamp.to_string())],
            &self.api_secret,
        );
        let data_uri = format!("data:{};base64,{}", image.content_type, BASE64.encode(&image.bytes));

        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);
        let response = self.client
            .post(&url)
            .json(&json!({
                "file": data_uri,
                "folder": DOCTOR_IMAGE_FOLDER,
                "timestamp": timestamp,
                "api_key": self.api_key,
                "signature": signature,
                "signature_algorithm": "sha256"
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Cloudinary upload failed ({}): {}", status, error_text);
            return Err(anyhow!("Cloudinary upload failed ({}): {}", status, error_text));
        }

        let uploaded: UploadResponse = response.json().await?;
        info!("Image uploaded to {}", uploaded.secure_url);

        Ok(uploaded.secure_url)
    }
}

/// Cloudinary request signature: parameters sorted by name, joined as
/// `k=v&k=v`, secret appended, SHA-256 hex digest.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{}{}", to_sign, api_secret).as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
