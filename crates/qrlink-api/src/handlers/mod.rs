pub mod qr;
pub mod root;
