//! Binary image resources resolved during assembly.

use serde::{Deserialize, Serialize};

/// An image loaded from storage and embedded in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResource {
    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Storage path the image was read from
    pub path: String,
}

impl ImageResource {
    /// Create an image resource, detecting the MIME type from magic bytes.
    pub fn new(data: Vec<u8>, path: impl Into<String>) -> Self {
        let path = path.into();
        let mime_type = Self::detect_mime_type(&data)
            .or_else(|| Self::mime_from_path(&path))
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            data,
            mime_type,
            path,
        }
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpeg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: little-endian or big-endian byte order mark
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        None
    }

    /// Guess MIME type from a file extension.
    fn mime_from_path(path: &str) -> Option<&'static str> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "tif" | "tiff" => Some("image/tiff"),
            "bmp" => Some("image/bmp"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime_type() {
        let jpeg_data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(ImageResource::detect_mime_type(&jpeg_data), Some("image/jpeg"));

        let png_data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageResource::detect_mime_type(&png_data), Some("image/png"));

        let unknown = vec![0x00, 0x00, 0x00, 0x00];
        assert_eq!(ImageResource::detect_mime_type(&unknown), None);
    }

    #[test]
    fn test_new_falls_back_to_extension() {
        let img = ImageResource::new(vec![1, 2, 3], "pics/chart.PNG");
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.extension(), "png");

        let img = ImageResource::new(vec![1, 2, 3], "pics/blob");
        assert_eq!(img.extension(), "bin");
    }
}
