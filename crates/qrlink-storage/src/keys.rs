//! Object key and public URL derivation.
//!
//! Key format: `qr_codes/{url after "//"}.png`. Changing this changes which
//! objects previously returned references resolve to.

use qrlink_core::constants::{GCS_PUBLIC_BASE_URL, QR_KEY_PREFIX, QR_KEY_SUFFIX};

/// Derive the object key for an encoded URL.
///
/// The scheme is dropped by keeping the text after the last `"//"`. Input
/// without `"//"` is used whole. No normalization or collision check is done.
pub fn derive_object_key(url: &str) -> String {
    let path = url.rsplit_once("//").map_or(url, |(_, rest)| rest);
    format!("{}{}{}", QR_KEY_PREFIX, path, QR_KEY_SUFFIX)
}

/// Public URL of an object in a Google Cloud Storage bucket.
pub fn gcs_public_url(bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", GCS_PUBLIC_BASE_URL, bucket, key)
}
