//! Content-Type to file extension, for URLs whose path carries none.

/// Returns the conventional extension (with dot) for a media type, if known.
/// Parameters (`; charset=...`) are ignored.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let ext = match mime.as_str() {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        "image/avif" => ".avif",
        "image/bmp" => ".bmp",
        "image/x-icon" | "image/vnd.microsoft.icon" => ".ico",
        "text/css" => ".css",
        "text/javascript" | "application/javascript" => ".js",
        "font/woff" => ".woff",
        "font/woff2" => ".woff2",
        "font/ttf" => ".ttf",
        "application/json" => ".json",
        "text/plain" => ".txt",
        _ => return None,
    };
    Some(ext)
}
