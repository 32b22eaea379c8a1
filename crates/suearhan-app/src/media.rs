//! Image upload helper.
//!
//! Listings, profile pictures and chat attachments are all stored as
//! data-URL strings; the store treats them as opaque blobs and validates
//! neither size nor format.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Read a file and encode it as a `data:<mime>;base64,...` URL.
///
/// The MIME type is sniffed from the file extension only.
pub fn file_to_data_url(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
