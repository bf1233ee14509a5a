//! Generated record assets: client identifier badges and company logos.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, Luma};
use qrcode::QrCode;
use service_core::error::AppError;
use std::io::Cursor;
use std::path::PathBuf;
use uuid::Uuid;

/// Deterministic asset name for a client badge.
pub fn client_badge_name(client_id: Uuid) -> String {
    format!("client_{}.png", client_id)
}

/// Deterministic asset name for a company logo.
pub fn company_logo_name(company_id: Uuid) -> String {
    format!("logo_{}.png", company_id)
}

/// Render the badge payload as a QR code PNG.
pub fn badge_png(payload: &str) -> Result<Vec<u8>, AppError> {
    let code = QrCode::new(payload)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode QR code: {}", e)))?;
    let image = code.render::<Luma<u8>>().build();

    let dynamic_image = DynamicImage::ImageLuma8(image);
    let mut buffer = Cursor::new(Vec::new());
    dynamic_image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode PNG: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Badge PNG as base64, for embedding in JSON responses.
pub fn badge_base64(payload: &str) -> Result<String, AppError> {
    Ok(general_purpose::STANDARD.encode(badge_png(payload)?))
}

/// Seam to the attached asset store; the backend itself is out of scope.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), AppError>;
}

/// Local-filesystem asset store rooted at a configured directory.
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(name), bytes).await?;
        Ok(())
    }
}
