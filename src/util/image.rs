//! Image payload helpers: data URLs and natural dimensions

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Mime type from the file contents, falling back to the extension
pub fn mime_type(bytes: &[u8], path: Option<&Path>) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    path.and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .and_then(image::ImageFormat::from_extension)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// `data:{mime};base64,...` for the given bytes
pub fn data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Payload of a `data:` URL; `None` for other URLs or a malformed payload
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if meta.ends_with(";base64") {
        STANDARD.decode(payload.trim()).ok()
    } else {
        Some(payload.as_bytes().to_vec())
    }
}

/// Natural dimensions read from the image header
pub fn dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Natural dimensions of an image URL. Only `data:` URLs are read; remote
/// URLs are not fetched and report no dimensions.
pub fn probe_url(url: &str) -> Option<(u32, u32)> {
    match decode_data_url(url) {
        Some(bytes) => dimensions(&bytes),
        None => {
            tracing::debug!(url, "remote image not probed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::new_rgba8(width, height)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_data_url_round_trip() {
        let bytes = png(4, 3);
        let url = data_url(&bytes, mime_type(&bytes, None));
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url), Some(bytes));
    }

    #[test]
    fn test_probe_data_url() {
        let bytes = png(40, 30);
        let url = data_url(&bytes, "image/png");
        assert_eq!(probe_url(&url), Some((40, 30)));
    }

    #[test]
    fn test_remote_urls_are_not_probed() {
        assert_eq!(probe_url("https://example.com/cat.png"), None);
    }

    #[test]
    fn test_mime_falls_back_to_extension() {
        assert_eq!(mime_type(b"not an image", Some(Path::new("a.jpg"))), "image/jpeg");
        assert_eq!(mime_type(b"not an image", None), "application/octet-stream");
    }

    #[test]
    fn test_garbage_has_no_dimensions() {
        assert_eq!(dimensions(b"garbage"), None);
        assert_eq!(decode_data_url("data:image/png;base64,@@@"), None);
    }
}
