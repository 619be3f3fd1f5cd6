//! Constants shared across crates.

/// Prefix of every object key written for a generated QR code.
pub const QR_KEY_PREFIX: &str = "qr_codes/";

/// Suffix appended to every object key.
pub const QR_KEY_SUFFIX: &str = ".png";

/// Content type declared on every uploaded artifact.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Public host serving Google Cloud Storage objects.
pub const GCS_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";

/// Bucket used when `GCS_BUCKET` is not set.
pub const DEFAULT_BUCKET: &str = "my_generated_qrs";
