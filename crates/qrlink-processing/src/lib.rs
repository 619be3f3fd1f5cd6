//! qrlink Processing Library
//!
//! Turns text into QR symbols and serializes them as PNG images in memory.
//! Encoding is delegated to the `qrcode` crate and rasterization to `image`.

pub mod qr;

pub use qr::{generate_png, ErrorCorrection, QrError, QrRenderOptions, QrSymbol};
