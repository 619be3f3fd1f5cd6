use super::{QrError, QrRenderOptions, QrSymbol, MAX_VERSION};
use qrcode::types::{Color, QrError as EncodeError};
use qrcode::{QrCode, Version};

/// Encode `data` into the smallest symbol at or above `options.min_version`.
///
/// Data is encoded verbatim; nothing checks that it is a well-formed URL.
pub fn encode(data: &str, options: &QrRenderOptions) -> Result<QrSymbol, QrError> {
    options.validate()?;
    let ec_level = options.ec_level.to_ec_level();

    for version in options.min_version..=MAX_VERSION {
        match QrCode::with_version(data.as_bytes(), Version::Normal(version), ec_level) {
            Ok(code) => {
                let width = code.width();
                let modules = code
                    .to_colors()
                    .into_iter()
                    .map(|color| color == Color::Dark)
                    .collect();
                tracing::debug!(
                    version,
                    width,
                    ec_level = %options.ec_level,
                    data_len = data.len(),
                    "QR symbol encoded"
                );
                return Ok(QrSymbol {
                    version,
                    width,
                    modules,
                });
            }
            Err(EncodeError::DataTooLong) => continue,
            Err(e) => return Err(QrError::Encode(e.to_string())),
        }
    }

    Err(QrError::DataTooLong)
}
