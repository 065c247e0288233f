//! Image file encoding into `data:` URLs.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Resolve a MIME type from the file extension. Unknown extensions fall back
/// to `image/jpeg`, matching the upstream API's lenient handling.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Build a `data:<mime>;base64,<payload>` URL from raw bytes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Read and encode each image file. Unreadable files are skipped with a
/// warning rather than aborting the batch; an empty result means the caller
/// must omit the `images` field entirely.
pub fn encode_image_files<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut encoded = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => encoded.push(data_url(mime_for_path(path), &bytes)),
            Err(e) => {
                tracing::warn!("Skipping image {}: {}", path.display(), e);
            }
        }
    }
    encoded
}

/// Download an image over HTTP and encode it as a `data:image/jpeg` URL,
/// the way generated images are re-sent to the kin. Failures are logged and
/// yield `None`.
pub async fn fetch_data_url(url: &str) -> Option<String> {
    let response = match reqwest::get(url).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch image {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::error!("HTTP {} while fetching image {}", response.status(), url);
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(data_url("image/jpeg", &bytes)),
        Err(e) => {
            tracing::error!("Failed to read image body from {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
    }

    #[test]
    fn test_mime_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("PHOTO.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("photo.JpG")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension_defaults_to_jpeg() {
        assert_eq!(mime_for_path(Path::new("a.bmp")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_data_url_prefix() {
        let url = data_url("image/png", b"abc");
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("pic.png");
        let mut f = std::fs::File::create(&good).unwrap();
        f.write_all(b"not really a png").unwrap();

        let missing = dir.path().join("missing.jpg");
        let encoded = encode_image_files(&[good, missing]);

        assert_eq!(encoded.len(), 1);
        assert!(encoded[0].starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_all_unreadable_yields_empty() {
        let paths: Vec<PathBuf> = vec!["/nonexistent/a.jpg".into(), "/nonexistent/b.png".into()];
        assert!(encode_image_files(&paths).is_empty());
    }
}
