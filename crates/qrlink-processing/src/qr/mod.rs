//! QR symbol generation.
//!
//! [`encoder`] picks the smallest symbol version that fits the data and
//! [`render`] rasterizes it black-on-white before serializing to PNG.

mod encoder;
mod render;

pub use encoder::encode;
pub use render::render_png;

use qrlink_core::QrConfig;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest symbol version defined for QR Model 2.
pub const MAX_VERSION: i16 = 40;

/// QR generation errors
#[derive(Debug, Error)]
pub enum QrError {
    #[error("data too long to fit in a QR symbol (max version 40)")]
    DataTooLong,

    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("invalid QR options: {0}")]
    InvalidOptions(String),

    #[error("PNG rendering failed: {0}")]
    Render(String),
}

impl QrError {
    /// Whether the failure comes from the input rather than from rendering.
    pub fn is_input_error(&self) -> bool {
        matches!(self, QrError::DataTooLong | QrError::Encode(_))
    }
}

/// Error-correction level of the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    #[default]
    Low,
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    pub(crate) fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrection::Low),
            "m" | "medium" => Ok(ErrorCorrection::Medium),
            "q" | "quartile" => Ok(ErrorCorrection::Quartile),
            "h" | "high" => Ok(ErrorCorrection::High),
            other => Err(QrError::InvalidOptions(format!(
                "unknown error correction level '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        };
        f.write_str(s)
    }
}

/// Fixed parameters applied to every generated symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrRenderOptions {
    pub ec_level: ErrorCorrection,
    /// Pixels per module side
    pub box_size: u32,
    /// Light modules surrounding the symbol on every side
    pub border: u32,
    /// First version tried by the best-fit search
    pub min_version: i16,
}

impl Default for QrRenderOptions {
    fn default() -> Self {
        Self {
            ec_level: ErrorCorrection::Low,
            box_size: 10,
            border: 4,
            min_version: 1,
        }
    }
}

impl QrRenderOptions {
    /// Build options from configuration, rejecting invalid values.
    pub fn from_config(config: &QrConfig) -> Result<Self, QrError> {
        let options = Self {
            ec_level: config.error_correction.parse()?,
            box_size: config.box_size,
            border: config.border,
            min_version: config.min_version,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), QrError> {
        if self.box_size == 0 {
            return Err(QrError::InvalidOptions(
                "box size must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_VERSION).contains(&self.min_version) {
            return Err(QrError::InvalidOptions(format!(
                "minimum version must be between 1 and {}",
                MAX_VERSION
            )));
        }
        Ok(())
    }
}

/// An encoded symbol as a square grid of dark/light modules.
#[derive(Debug, Clone)]
pub struct QrSymbol {
    version: i16,
    width: usize,
    modules: Vec<bool>,
}

impl QrSymbol {
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Modules per side, excluding the border
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

/// Encode `data` and render it as PNG bytes.
pub fn generate_png(data: &str, options: &QrRenderOptions) -> Result<Vec<u8>, QrError> {
    let symbol = encode(data, options)?;
    render_png(&symbol, options)
}
