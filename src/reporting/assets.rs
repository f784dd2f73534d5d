use std::path::Path;
use data_encoding::BASE64;
use tracing::{debug, info};
use crate::errors::ReportError;

/// Company logo bytes plus what the renderers need to place them.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub extension: &'static str,
    /// Pixel size, when the header could be read.
    pub dimensions: Option<(u32, u32)>,
}

impl LogoAsset {
    pub fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self, ReportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let (mime, extension) = match ext.as_str() {
            "png" => ("image/png", "png"),
            "jpg" | "jpeg" => ("image/jpeg", "jpeg"),
            "gif" => ("image/gif", "gif"),
            _ if bytes.starts_with(PNG_SIGNATURE) => ("image/png", "png"),
            other => {
                return Err(ReportError::AssetMissing(format!(
                    "Unsupported logo format '{}': {}",
                    other,
                    path.display()
                )))
            }
        };
        let dimensions = if extension == "png" { png_dimensions(&bytes) } else { None };
        Ok(Self { bytes, mime, extension, dimensions })
    }

    /// Inline `data:` URI for the HTML header.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    /// Width over height, 1.0 when unknown.
    pub fn aspect_ratio(&self) -> f64 {
        match self.dimensions {
            Some((w, h)) if w > 0 && h > 0 => w as f64 / h as f64,
            _ => 1.0,
        }
    }
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Width and height from the IHDR chunk.
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || !bytes.starts_with(PNG_SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// Load the logo. Any problem is logged and the report goes on without one.
pub async fn load_logo(path: Option<&Path>) -> Option<LogoAsset> {
    let path = path?;
    let result = match tokio::fs::read(path).await {
        Ok(bytes) => LogoAsset::from_bytes(bytes, path),
        Err(e) => Err(ReportError::AssetMissing(format!("{}: {}", path.display(), e))),
    };
    match result {
        Ok(logo) => {
            debug!(path = %path.display(), bytes = logo.bytes.len(), dimensions = ?logo.dimensions, "Logo loaded");
            Some(logo)
        }
        Err(e) => {
            info!(error = %e, "Continuing without logo");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_dimensions() {
        let logo = LogoAsset::from_bytes(tiny_png(400, 100), Path::new("logo.PNG")).unwrap();
        assert_eq!(logo.mime, "image/png");
        assert_eq!(logo.dimensions, Some((400, 100)));
        assert_eq!(logo.aspect_ratio(), 4.0);
    }

    #[test]
    fn test_data_uri() {
        let logo = LogoAsset::from_bytes(vec![1, 2, 3], Path::new("logo.jpg")).unwrap();
        assert_eq!(logo.data_uri(), "data:image/jpeg;base64,AQID");
        assert_eq!(logo.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = LogoAsset::from_bytes(vec![0; 4], Path::new("logo.bmp")).unwrap_err();
        assert!(matches!(err, ReportError::AssetMissing(_)));
    }

    #[tokio::test]
    async fn test_missing_logo_is_none() {
        assert!(load_logo(Some(Path::new("/nonexistent/logo.png"))).await.is_none());
        assert!(load_logo(None).await.is_none());
    }

    #[tokio::test]
    async fn test_load_logo_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brand.png");
        std::fs::write(&path, tiny_png(10, 20)).unwrap();
        let logo = load_logo(Some(&path)).await.unwrap();
        assert_eq!(logo.dimensions, Some((10, 20)));
    }
}
